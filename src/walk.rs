use smallvec::SmallVec;

use crate::ast::*;
use crate::position::Position;
use crate::token::{LiteralValue, Token, TokenKind};

// Core traits
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V);
}

/// Visits every child of a node in source order. Derived with `#[derive(WalkAst)]`.
pub trait WalkChildren<'ast> {
    fn walk_children<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V);
}

/// Hooks for the node kinds a pass typically cares about.
///
/// Every default recurses into the node's children, so overriding one method and calling
/// `walk_children` (or not) decides whether the subtree is visited.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_file(&mut self, f: &'ast File) {
        f.walk_children(self);
    }

    #[inline(always)]
    fn visit_import(&mut self, i: &'ast Import) {
        i.walk_children(self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, d: &'ast Decl) {
        d.walk_children(self);
    }

    #[inline(always)]
    fn visit_func(&mut self, f: &'ast FuncOrMethodDecl) {
        f.walk_children(self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, s: &'ast FunctionSignature) {
        s.walk_children(self);
    }

    #[inline(always)]
    fn visit_param(&mut self, p: &'ast ParameterDecl) {
        p.walk_children(self);
    }

    #[inline(always)]
    fn visit_type_ref(&mut self, t: &'ast TypeRef) {
        t.walk_children(self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, e: &'ast Expr) {
        e.walk_children(self);
    }

    #[inline(always)]
    fn visit_block(&mut self, _b: &'ast Block) {}

    #[inline(always)]
    fn visit_ident(&mut self, _i: &'ast Ident) {}
}

macro_rules! impl_walk_with_hook {
    ($($ty:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
                    v.$visit(self);
                }
            }
        )*
    };
}

impl_walk_with_hook! {
    File => visit_file,
    Import => visit_import,
    Decl => visit_decl,
    FuncOrMethodDecl => visit_func,
    FunctionSignature => visit_signature,
    ParameterDecl => visit_param,
    TypeRef => visit_type_ref,
    Expr => visit_expr,
    Block => visit_block,
    Ident => visit_ident,
}

// Nodes without a hook of their own go straight to their children.
macro_rules! impl_walk_transparent {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
                    self.walk_children(v);
                }
            }
        )*
    };
}

impl_walk_transparent! {
    NamedType,
    FieldGroup,
    MethodSpec,
    InterfaceElem,
    ParameterDeclList,
    ImportName,
}

// Utilities
impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
        if let Some(x) = self {
            x.walk(v);
        }
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Box<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
        (**self).walk(v);
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Vec<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
        for item in self {
            item.walk(v);
        }
    }
}

impl<'ast, A> Walk<'ast> for SmallVec<A>
where
    A: smallvec::Array,
    A::Item: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, v: &mut V) {
        for item in self.iter() {
            item.walk(v);
        }
    }
}

// No-ops for leaf types
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&'ast self, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Position,
    String,
    bool,
    ChanDir,
    TokenKind,
    Token,
    LiteralValue,
    StringLit,
    BasicLit,
}

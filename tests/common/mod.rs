//! Position-blind tree shapes for comparing a parse with the parse of its printed form.

#![allow(dead_code)]

use gofront::ast::{
    Block, Expr, FieldGroup, FuncOrMethodDecl, Ident, Import, ImportName, InterfaceElem,
    ParameterDecl, TypeRef,
};
use gofront::walk::{Visitor, Walk, WalkChildren};
use gofront::TokenKind;

/// One line per node in walk order: variant, names, flags and literal values, never positions.
#[derive(Debug, Default)]
pub struct Shape(pub Vec<String>);

pub fn shape<'ast, T: Walk<'ast> + ?Sized>(node: &'ast T) -> Vec<String> {
    let mut s = Shape::default();
    node.walk(&mut s);
    s.0
}

fn field(g: &FieldGroup) -> String {
    let tag = g.tag.as_ref().map(|t| t.value.as_str());
    format!("field names={} tag={tag:?}", g.names.len())
}

impl<'ast> Visitor<'ast> for Shape {
    fn visit_import(&mut self, i: &'ast Import) {
        let name = match &i.name {
            None => "-".to_owned(),
            Some(ImportName::Dot(_)) => ".".to_owned(),
            Some(ImportName::Blank(_)) => "_".to_owned(),
            Some(ImportName::Named(id)) => id.name.clone(),
        };
        self.0.push(format!("import {name} {:?}", i.path.value));
    }

    fn visit_func(&mut self, f: &'ast FuncOrMethodDecl) {
        self.0.push(format!(
            "func method={} body={}",
            f.is_method(),
            f.body.is_some()
        ));
        f.walk_children(self);
    }

    fn visit_param(&mut self, p: &'ast ParameterDecl) {
        self.0.push(format!(
            "param named={} inferred={} variadic={}",
            p.name.is_some(),
            p.type_was_inferred,
            p.variadic
        ));
        p.walk_children(self);
    }

    fn visit_signature(&mut self, s: &'ast gofront::ast::FunctionSignature) {
        self.0.push(format!(
            "sig args={} results={:?}",
            s.args.len(),
            s.results.as_ref().map(|r| r.len())
        ));
        s.walk_children(self);
    }

    fn visit_type_ref(&mut self, t: &'ast TypeRef) {
        let line = match t {
            TypeRef::Named(n) => format!("named qualified={}", n.package.is_some()),
            TypeRef::Array { .. } => "array".to_owned(),
            TypeRef::Slice { .. } => "slice".to_owned(),
            TypeRef::EllipsisArray { .. } => "ellipsis-array".to_owned(),
            TypeRef::Struct { fields, .. } => {
                let fields: Vec<_> = fields.iter().map(field).collect();
                format!("struct [{}]", fields.join(", "))
            }
            TypeRef::Pointer { .. } => "pointer".to_owned(),
            TypeRef::Func { .. } => "func".to_owned(),
            TypeRef::Interface { elems, .. } => {
                let elems: Vec<_> = elems
                    .iter()
                    .map(|e| match e {
                        InterfaceElem::Method(_) => "method",
                        InterfaceElem::Embedded(_) => "embedded",
                    })
                    .collect();
                format!("interface [{}]", elems.join(", "))
            }
            TypeRef::Map { .. } => "map".to_owned(),
            TypeRef::Chan { dir, .. } => format!("chan {dir:?}"),
        };
        self.0.push(line);
        t.walk_children(self);
    }

    fn visit_expr(&mut self, e: &'ast Expr) {
        let line = match e {
            Expr::Ident(_) => "ident".to_owned(),
            Expr::BasicLit(lit) => format!("lit {:?} {:?}", lit.kind, lit.value),
            Expr::Selector { .. } => "selector".to_owned(),
            Expr::Paren { .. } => "paren".to_owned(),
            Expr::Unary { op, .. } => format!("unary {op:?}"),
            Expr::Binary { op, .. } => format!("binary {op:?}"),
            Expr::Call { args, .. } => format!("call {}", args.len()),
        };
        self.0.push(line);
        e.walk_children(self);
    }

    // Elided and explicit semicolons print alike, so only their kind is kept.
    fn visit_block(&mut self, b: &'ast Block) {
        let toks: Vec<_> = b
            .tokens
            .iter()
            .map(|t| match t.kind {
                TokenKind::Semicolon => ";".to_owned(),
                _ => format!("{:?}:{}", t.kind, t.text()),
            })
            .collect();
        self.0.push(format!("block {}", toks.join(" ")));
    }

    fn visit_ident(&mut self, i: &'ast Ident) {
        self.0.push(format!("ident {}", i.name));
    }
}

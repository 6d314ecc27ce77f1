//! Syntax tree produced by the parser.
//!
//! ## Architecture
//!
//! - **Single-owner tree**: every node owns its children (`Box`, `Vec`), no sharing, no cycles
//! - **Closed families**: `TypeRef`, `InterfaceElem`, `Decl` and `Expr` are enums, matched
//!   exhaustively
//! - **Positions**: every node answers `begin()`/`end()` through [`Node`]
//! - Walk/Visitor infrastructure lives in `walk.rs`; `#[derive(WalkAst)]` generates the child
//!   traversal
//! - `Display` renders Go source that parses back to the same tree

use std::fmt;

use ast_derive::WalkAst;
use smallvec::SmallVec;

use crate::position::Position;
use crate::token::{LiteralValue, Token, TokenKind};

/// Anything with a source extent.
pub trait Node {
    fn begin(&self) -> &Position;
    /// Position just past the node.
    fn end(&self) -> Position;
}

// =============================================================================
// Leaves
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
    pub pos: Position,
}

impl Ident {
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

impl Node for Ident {
    fn begin(&self) -> &Position {
        &self.pos
    }

    fn end(&self) -> Position {
        self.pos.moved(self.name.chars().count())
    }
}

/// A string literal kept both as written and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLit {
    pub pos: Position,
    pub raw: String,
    pub value: String,
}

impl Node for StringLit {
    fn begin(&self) -> &Position {
        &self.pos
    }

    fn end(&self) -> Position {
        self.pos.moved(self.raw.chars().count())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub pos: Position,
    pub kind: TokenKind,
    pub raw: String,
    pub value: LiteralValue,
}

impl Node for BasicLit {
    fn begin(&self) -> &Position {
        &self.pos
    }

    fn end(&self) -> Position {
        self.pos.moved(self.raw.chars().count())
    }
}

// =============================================================================
// Type references
// =============================================================================

/// `name` or `package.name`.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct NamedType {
    pub package: Option<Ident>,
    pub name: Ident,
}

impl Node for NamedType {
    fn begin(&self) -> &Position {
        match &self.package {
            Some(pkg) => &pkg.pos,
            None => &self.name.pos,
        }
    }

    fn end(&self) -> Position {
        self.name.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
    /// `chan T`
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum TypeRef {
    Named(NamedType),
    /// `[len]T`
    Array {
        begin: Position,
        len: Box<Expr>,
        elem: Box<TypeRef>,
    },
    /// `[]T`
    Slice { begin: Position, elem: Box<TypeRef> },
    /// `[...]T`
    EllipsisArray { begin: Position, elem: Box<TypeRef> },
    Struct {
        begin: Position,
        fields: Vec<FieldGroup>,
        end: Position,
    },
    Pointer { begin: Position, elem: Box<TypeRef> },
    Func {
        begin: Position,
        signature: Box<FunctionSignature>,
    },
    Interface {
        begin: Position,
        elems: Vec<InterfaceElem>,
        end: Position,
    },
    Map {
        begin: Position,
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    Chan {
        begin: Position,
        dir: ChanDir,
        elem: Box<TypeRef>,
    },
}

impl TypeRef {
    /// The identifier if this is an unqualified named type.
    pub fn as_bare_ident(&self) -> Option<&Ident> {
        match self {
            TypeRef::Named(NamedType {
                package: None,
                name,
            }) => Some(name),
            _ => None,
        }
    }
}

impl Node for TypeRef {
    fn begin(&self) -> &Position {
        match self {
            TypeRef::Named(n) => n.begin(),
            TypeRef::Array { begin, .. }
            | TypeRef::Slice { begin, .. }
            | TypeRef::EllipsisArray { begin, .. }
            | TypeRef::Struct { begin, .. }
            | TypeRef::Pointer { begin, .. }
            | TypeRef::Func { begin, .. }
            | TypeRef::Interface { begin, .. }
            | TypeRef::Map { begin, .. }
            | TypeRef::Chan { begin, .. } => begin,
        }
    }

    fn end(&self) -> Position {
        match self {
            TypeRef::Named(n) => n.end(),
            TypeRef::Array { elem, .. }
            | TypeRef::Slice { elem, .. }
            | TypeRef::EllipsisArray { elem, .. }
            | TypeRef::Pointer { elem, .. }
            | TypeRef::Chan { elem, .. } => elem.end(),
            TypeRef::Struct { end, .. } | TypeRef::Interface { end, .. } => end.clone(),
            TypeRef::Func { signature, .. } => signature.end(),
            TypeRef::Map { value, .. } => value.end(),
        }
    }
}

/// Fields sharing one type. No names means an embedded field.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FieldGroup {
    pub names: SmallVec<[Ident; 2]>,
    pub ty: TypeRef,
    pub tag: Option<StringLit>,
}

impl FieldGroup {
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct MethodSpec {
    pub name: Ident,
    pub signature: FunctionSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    Method(MethodSpec),
    Embedded(NamedType),
}

// =============================================================================
// Signatures and parameters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FunctionSignature {
    pub args: ParameterDeclList,
    pub results: Option<ParameterDeclList>,
}

impl Node for FunctionSignature {
    fn begin(&self) -> &Position {
        &self.args.begin
    }

    fn end(&self) -> Position {
        match &self.results {
            Some(results) => results.end(),
            None => self.args.end(),
        }
    }
}

/// A parenthesized parameter list, or a single bare result type.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ParameterDeclList {
    pub begin: Position,
    pub decls: Vec<ParameterDecl>,
    pub end: Position,
}

impl ParameterDeclList {
    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn is_named(&self) -> bool {
        self.decls.iter().any(|d| d.name.is_some())
    }
}

impl Node for ParameterDeclList {
    fn begin(&self) -> &Position {
        &self.begin
    }

    fn end(&self) -> Position {
        self.end.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ParameterDecl {
    pub name: Option<Ident>,
    /// The type was taken from a later entry, as `a` in `(a, b int)`.
    pub type_was_inferred: bool,
    /// `...T`
    pub variadic: bool,
    pub ty: TypeRef,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    /// `x.sel`
    Selector { base: Box<Expr>, sel: Ident },
    Paren {
        begin: Position,
        inner: Box<Expr>,
        end: Position,
    },
    Unary {
        begin: Position,
        op: TokenKind,
        operand: Box<Expr>,
    },
    Binary {
        op: TokenKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        end: Position,
    },
}

impl Node for Expr {
    fn begin(&self) -> &Position {
        match self {
            Expr::Ident(id) => &id.pos,
            Expr::BasicLit(lit) => &lit.pos,
            Expr::Selector { base, .. } => base.begin(),
            Expr::Paren { begin, .. } | Expr::Unary { begin, .. } => begin,
            Expr::Binary { lhs, .. } => lhs.begin(),
            Expr::Call { func, .. } => func.begin(),
        }
    }

    fn end(&self) -> Position {
        match self {
            Expr::Ident(id) => id.end(),
            Expr::BasicLit(lit) => lit.end(),
            Expr::Selector { sel, .. } => sel.end(),
            Expr::Paren { end, .. } | Expr::Call { end, .. } => end.clone(),
            Expr::Unary { operand, .. } => operand.end(),
            Expr::Binary { rhs, .. } => rhs.end(),
        }
    }
}

// =============================================================================
// Declarations and file
// =============================================================================

/// Function body kept as its balanced token sequence, braces excluded.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub begin: Position,
    #[walk(skip)]
    pub tokens: Vec<Token>,
    pub end: Position,
}

impl Node for Block {
    fn begin(&self) -> &Position {
        &self.begin
    }

    fn end(&self) -> Position {
        self.end.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FuncOrMethodDecl {
    pub begin: Position,
    /// Exactly one named parameter when present.
    pub receiver: Option<ParameterDeclList>,
    pub name: Ident,
    pub signature: FunctionSignature,
    /// `None` for a declaration without body.
    pub body: Option<Block>,
}

impl FuncOrMethodDecl {
    #[inline]
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum Decl {
    FuncOrMethod(FuncOrMethodDecl),
}

impl Node for Decl {
    fn begin(&self) -> &Position {
        match self {
            Decl::FuncOrMethod(f) => &f.begin,
        }
    }

    fn end(&self) -> Position {
        match self {
            Decl::FuncOrMethod(f) => match &f.body {
                Some(body) => body.end(),
                None => f.signature.end(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    /// `import . "path"`
    Dot(Position),
    /// `import _ "path"`
    Blank(Position),
    Named(Ident),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Import {
    pub begin: Position,
    pub name: Option<ImportName>,
    pub path: StringLit,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct File {
    pub begin: Position,
    pub package: Ident,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

impl File {
    pub fn funcs(&self) -> impl Iterator<Item = &FuncOrMethodDecl> {
        self.decls.iter().map(|d| match d {
            Decl::FuncOrMethod(f) => f,
        })
    }
}

// =============================================================================
// Printing
// =============================================================================

struct Sep<'a, T>(&'a [T], &'static str);

impl<T: fmt::Display> fmt::Display for Sep<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(pkg) => write!(f, "{pkg}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(n) => write!(f, "{n}"),
            TypeRef::Array { len, elem, .. } => write!(f, "[{len}]{elem}"),
            TypeRef::Slice { elem, .. } => write!(f, "[]{elem}"),
            TypeRef::EllipsisArray { elem, .. } => write!(f, "[...]{elem}"),
            TypeRef::Struct { fields, .. } if fields.is_empty() => f.write_str("struct{}"),
            TypeRef::Struct { fields, .. } => write!(f, "struct {{ {} }}", Sep(fields.as_slice(), "; ")),
            TypeRef::Pointer { elem, .. } => write!(f, "*{elem}"),
            TypeRef::Func { signature, .. } => write!(f, "func{signature}"),
            TypeRef::Interface { elems, .. } if elems.is_empty() => f.write_str("interface{}"),
            TypeRef::Interface { elems, .. } => {
                write!(f, "interface {{ {} }}", Sep(elems.as_slice(), "; "))
            }
            TypeRef::Map { key, value, .. } => write!(f, "map[{key}]{value}"),
            TypeRef::Chan { dir, elem, .. } => match dir {
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
                // `chan <-chan T` would read back as a send-only channel.
                ChanDir::Both => match elem.as_ref() {
                    TypeRef::Chan {
                        dir: ChanDir::Recv,
                        ..
                    } => write!(f, "chan ({elem})"),
                    _ => write!(f, "chan {elem}"),
                },
            },
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write!(f, "{} ", Sep(self.names.as_slice(), ", "))?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(tag) = &self.tag {
            write!(f, " {}", tag.raw)?;
        }
        Ok(())
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceElem::Method(m) => write!(f, "{}{}", m.name, m.signature),
            InterfaceElem::Embedded(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for ParameterDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
            if self.type_was_inferred {
                return Ok(());
            }
            f.write_str(" ")?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for ParameterDeclList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", Sep(self.decls.as_slice(), ", "))
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args)?;
        match &self.results {
            None => Ok(()),
            Some(results) => match results.decls.as_slice() {
                [single] if single.name.is_none() && !single.variadic => {
                    write!(f, " {}", single.ty)
                }
                _ => write!(f, " {results}"),
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(id) => write!(f, "{id}"),
            Expr::BasicLit(lit) => f.write_str(&lit.raw),
            // `1 .x` must not print as the float `1.` followed by `x`.
            Expr::Selector { base, sel } if matches!(base.as_ref(), Expr::BasicLit(_)) => {
                write!(f, "{base} .{sel}")
            }
            Expr::Selector { base, sel } => write!(f, "{base}.{sel}"),
            Expr::Paren { inner, .. } => write!(f, "({inner})"),
            // `- -x` must not print as `--x`.
            Expr::Unary { op, operand, .. } => match operand.as_ref() {
                Expr::Unary { .. } => write!(f, "{op} {operand}"),
                _ => write!(f, "{op}{operand}"),
            },
            Expr::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Expr::Call { func, args, .. } => write!(f, "{func}({})", Sep(args.as_slice(), ", ")),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for tok in &self.tokens {
            match tok.kind {
                TokenKind::Semicolon => f.write_str(" ;")?,
                _ => write!(f, " {}", tok.text())?,
            }
        }
        f.write_str(" }")
    }
}

impl fmt::Display for FuncOrMethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func ")?;
        if let Some(receiver) = &self.receiver {
            write!(f, "{receiver} ")?;
        }
        write!(f, "{}{}", self.name, self.signature)?;
        if let Some(body) = &self.body {
            write!(f, " {body}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decl::FuncOrMethod(func) => write!(f, "{func}"),
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("import ")?;
        match &self.name {
            Some(ImportName::Dot(_)) => f.write_str(". ")?,
            Some(ImportName::Blank(_)) => f.write_str("_ ")?,
            Some(ImportName::Named(id)) => write!(f, "{id} ")?,
            None => {}
        }
        f.write_str(&self.path.raw)
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package {}", self.package)?;
        if !self.imports.is_empty() {
            writeln!(f)?;
            for import in &self.imports {
                writeln!(f, "{import}")?;
            }
        }
        for decl in &self.decls {
            writeln!(f)?;
            writeln!(f, "{decl}")?;
        }
        Ok(())
    }
}

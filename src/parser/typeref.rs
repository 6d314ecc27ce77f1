use std::io::BufRead;

use smallvec::SmallVec;

use super::Parser;
use crate::ast::{
    ChanDir, FieldGroup, InterfaceElem, MethodSpec, NamedType, Node, StringLit, TypeRef,
};
use crate::error::{Error, Result};
use crate::position::Position;
use crate::token::{LiteralValue, TokenKind};

impl<R: BufRead> Parser<R> {
    /// Parses a type reference, failing if none starts at the lookahead.
    pub fn parse_type_ref(&mut self) -> Result<TypeRef> {
        match self.maybe_parse_type_ref()? {
            Some(ty) => Ok(ty),
            None => Err(self.unexpected("expected type")),
        }
    }

    /// Parses a type reference and reports whether it was exactly one bare identifier.
    ///
    /// A parenthesized identifier does not count as bare.
    pub(crate) fn parse_type_ref_or_ident(&mut self) -> Result<(TypeRef, bool)> {
        let starts_with_ident = self.peek_is(TokenKind::Identifier);
        let ty = self.parse_type_ref()?;
        let bare = starts_with_ident && ty.as_bare_ident().is_some();
        Ok((ty, bare))
    }

    /// `Ok(None)` when the lookahead cannot start a type; nothing is consumed then.
    pub fn maybe_parse_type_ref(&mut self) -> Result<Option<TypeRef>> {
        self.nested(Self::type_ref_inner)
    }

    // Arms live in helpers to keep this frame small.
    fn type_ref_inner(&mut self) -> Result<Option<TypeRef>> {
        let ty = match self.peek.kind {
            TokenKind::LParen => self.parse_paren_type()?,
            TokenKind::Identifier => TypeRef::Named(self.parse_named_type()?),
            TokenKind::LBracket => self.parse_bracket_type()?,
            TokenKind::StructKeyword => {
                let begin = self.keyword()?;
                self.nested(|p| p.parse_struct_body(begin))?
            }
            TokenKind::MulOp => {
                let begin = self.keyword()?;
                TypeRef::Pointer {
                    begin,
                    elem: self.parse_elem_type()?,
                }
            }
            TokenKind::FuncKeyword => {
                let begin = self.keyword()?;
                TypeRef::Func {
                    begin,
                    signature: Box::new(self.parse_signature(false)?),
                }
            }
            TokenKind::InterfaceKeyword => {
                let begin = self.keyword()?;
                self.nested(|p| p.parse_interface_body(begin))?
            }
            TokenKind::MapKeyword => self.parse_map_type()?,
            TokenKind::ChanKeyword | TokenKind::ChanOp => self.parse_chan_type()?,
            _ => return Ok(None),
        };
        Ok(Some(ty))
    }

    /// Consumes the lookahead and returns where it started.
    fn keyword(&mut self) -> Result<Position> {
        self.advance()?;
        Ok(self.tok.pos.clone())
    }

    fn parse_elem_type(&mut self) -> Result<Box<TypeRef>> {
        self.parse_type_ref().map(Box::new)
    }

    fn parse_paren_type(&mut self) -> Result<TypeRef> {
        self.advance()?;
        let inner = self.parse_type_ref()?;
        self.require("expected ')' to close parenthesized type", &[TokenKind::RParen])?;
        Ok(inner)
    }

    // []T, [...]T, [len]T
    fn parse_bracket_type(&mut self) -> Result<TypeRef> {
        let begin = self.keyword()?;
        if self.consume_if(TokenKind::RBracket)? {
            return Ok(TypeRef::Slice {
                begin,
                elem: self.parse_elem_type()?,
            });
        }
        if self.consume_if(TokenKind::EllipsisOp)? {
            self.require("expected ']' after '[...'", &[TokenKind::RBracket])?;
            return Ok(TypeRef::EllipsisArray {
                begin,
                elem: self.parse_elem_type()?,
            });
        }
        let len = Box::new(self.parse_expr()?);
        self.require("expected ']' after array length", &[TokenKind::RBracket])?;
        Ok(TypeRef::Array {
            begin,
            len,
            elem: self.parse_elem_type()?,
        })
    }

    fn parse_map_type(&mut self) -> Result<TypeRef> {
        let begin = self.keyword()?;
        self.require("expected '[' after 'map'", &[TokenKind::LBracket])?;
        let key = self.parse_elem_type()?;
        self.require("expected ']' after map key type", &[TokenKind::RBracket])?;
        Ok(TypeRef::Map {
            begin,
            key,
            value: self.parse_elem_type()?,
        })
    }

    // chan T, chan<- T, <-chan T
    fn parse_chan_type(&mut self) -> Result<TypeRef> {
        let begin = self.keyword()?;
        let dir = if self.tok.kind == TokenKind::ChanOp {
            self.require("expected 'chan' after '<-'", &[TokenKind::ChanKeyword])?;
            ChanDir::Recv
        } else if self.consume_if(TokenKind::ChanOp)? {
            ChanDir::Send
        } else {
            ChanDir::Both
        };
        Ok(TypeRef::Chan {
            begin,
            dir,
            elem: self.parse_elem_type()?,
        })
    }

    /// `name` or `package.name`.
    fn parse_named_type(&mut self) -> Result<NamedType> {
        let first = self.parse_identifier()?;
        if self.consume_if(TokenKind::Dot)? {
            let name = self.parse_identifier_or("expected type name after '.'")?;
            Ok(NamedType {
                package: Some(first),
                name,
            })
        } else {
            Ok(NamedType {
                package: None,
                name: first,
            })
        }
    }

    fn maybe_parse_tag(&mut self) -> Result<Option<StringLit>> {
        if !self.peek.kind.is_string_literal() {
            return Ok(None);
        }
        self.advance()?;
        Ok(Some(self.string_lit()?))
    }

    /// The current token as a string literal.
    pub(crate) fn string_lit(&self) -> Result<StringLit> {
        match &self.tok.payload {
            Some(LiteralValue::Str(value)) => Ok(StringLit {
                pos: self.tok.pos.clone(),
                raw: self.tok.text().to_owned(),
                value: value.clone(),
            }),
            _ => Err(Error::internal(
                &self.tok.pos,
                "string literal token without a string payload",
            )),
        }
    }

    // struct { FieldGroup ; ... }
    fn parse_struct_body(&mut self, begin: Position) -> Result<TypeRef> {
        self.require("expected '{' after 'struct'", &[TokenKind::LBrace])?;

        let mut fields = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            let (first, bare) = self.parse_type_ref_or_ident()?;

            // A bare identifier followed by more than a tag or a terminator names fields.
            let names_follow = bare
                && !matches!(
                    self.peek.kind,
                    TokenKind::Semicolon
                        | TokenKind::RBrace
                        | TokenKind::RawStringLiteral
                        | TokenKind::InterpretedStringLiteral
                );

            let group = if names_follow {
                let first_name = first.as_bare_ident().cloned().ok_or_else(|| {
                    Error::internal(first.begin(), "field name is not a bare identifier")
                })?;
                let mut names: SmallVec<[_; 2]> = SmallVec::new();
                names.push(first_name);
                while self.consume_if(TokenKind::Comma)? {
                    names.push(self.parse_identifier_or("expected field name after ','")?);
                }
                let ty = self.parse_type_ref()?;
                FieldGroup {
                    names,
                    ty,
                    tag: self.maybe_parse_tag()?,
                }
            } else {
                FieldGroup {
                    names: SmallVec::new(),
                    ty: first,
                    tag: self.maybe_parse_tag()?,
                }
            };
            fields.push(group);

            self.require_statement_terminator("expected ';' or '}' after struct field")?;
        }
        self.require("expected '}' to close struct", &[TokenKind::RBrace])?;

        Ok(TypeRef::Struct {
            begin,
            fields,
            end: self.tok.end(),
        })
    }

    // interface { Method(...) ... | Name | pkg.Name ; ... }
    fn parse_interface_body(&mut self, begin: Position) -> Result<TypeRef> {
        self.require("expected '{' after 'interface'", &[TokenKind::LBrace])?;

        let mut elems = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            let name = self.parse_identifier_or("expected method or embedded type name")?;
            let elem = if self.consume_if(TokenKind::Dot)? {
                let qualified = self.parse_identifier_or("expected type name after '.'")?;
                InterfaceElem::Embedded(NamedType {
                    package: Some(name),
                    name: qualified,
                })
            } else if self.peek_is(TokenKind::LParen) {
                InterfaceElem::Method(MethodSpec {
                    name,
                    signature: self.parse_signature(false)?,
                })
            } else {
                InterfaceElem::Embedded(NamedType {
                    package: None,
                    name,
                })
            };
            elems.push(elem);

            self.require_statement_terminator("expected ';' or '}' after interface element")?;
        }
        self.require("expected '}' to close interface", &[TokenKind::RBrace])?;

        Ok(TypeRef::Interface {
            begin,
            elems,
            end: self.tok.end(),
        })
    }
}

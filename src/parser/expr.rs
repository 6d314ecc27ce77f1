use std::io::BufRead;

use super::Parser;
use crate::ast::{BasicLit, Expr};
use crate::error::{Error, Result};
use crate::token::TokenKind;

/// Binary operator precedence, 5 binds tightest.
const fn binary_precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind::*;
    match kind {
        LogicOrOp => Some(1),
        LogicAndOp => Some(2),
        EqOp | NeqOp | LtOp | LteOp | GtOp | GteOp => Some(3),
        AddOp | SubOp | BitOrOp | BitXorOp => Some(4),
        MulOp | DivOp | ModOp | ShlOp | ShrOp | BitAndOp | BitClearOp => Some(5),
        _ => None,
    }
}

const fn is_unary_op(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        AddOp | SubOp | LogicNotOp | BitXorOp | MulOp | BitAndOp | ChanOp
    )
}

impl<R: BufRead> Parser<R> {
    /// Constant-style expression: operands, selectors, calls, unary and binary operators.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(|p| p.parse_binary_expr(1))
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary_expr()?;
        while let Some(prec) = binary_precedence(self.peek.kind) {
            if prec < min_prec {
                break;
            }
            self.advance()?;
            let op = self.tok.kind;
            let rhs = self.nested(|p| p.parse_binary_expr(prec + 1))?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr> {
        if !is_unary_op(self.peek.kind) {
            return self.parse_primary_expr();
        }
        self.advance()?;
        let begin = self.tok.pos.clone();
        let op = self.tok.kind;
        let operand = self.nested(Self::parse_unary_expr)?;
        Ok(Expr::Unary {
            begin,
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        match self.peek.kind {
            TokenKind::Identifier => Ok(Expr::Ident(self.parse_identifier()?)),
            TokenKind::LParen => {
                self.advance()?;
                let begin = self.tok.pos.clone();
                let inner = self.parse_expr()?;
                self.require("expected ')' to close expression", &[TokenKind::RParen])?;
                Ok(Expr::Paren {
                    begin,
                    inner: Box::new(inner),
                    end: self.tok.end(),
                })
            }
            kind if kind.is_literal() => {
                self.advance()?;
                let value = self.tok.payload.clone().ok_or_else(|| {
                    Error::internal(&self.tok.pos, "literal token without a value")
                })?;
                Ok(Expr::BasicLit(BasicLit {
                    pos: self.tok.pos.clone(),
                    kind,
                    raw: self.tok.text().to_owned(),
                    value,
                }))
            }
            _ => Err(self.unexpected("expected expression")),
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Expr> {
        self.nested(Self::primary_expr_inner)
    }

    fn primary_expr_inner(&mut self) -> Result<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            if self.consume_if(TokenKind::Dot)? {
                let sel = self.parse_identifier_or("expected selector after '.'")?;
                expr = Expr::Selector {
                    base: Box::new(expr),
                    sel,
                };
            } else if self.consume_if(TokenKind::LParen)? {
                let mut args = Vec::new();
                while !self.peek_is(TokenKind::RParen) {
                    args.push(self.parse_expr()?);
                    if !self.consume_if(TokenKind::Comma)? {
                        break;
                    }
                }
                self.require("expected ',' or ')' in call", &[TokenKind::RParen])?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    end: self.tok.end(),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }
}

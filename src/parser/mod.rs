//! Recursive-descent parser over the lexer's token stream.
//!
//! The parser holds the last consumed token (`tok`) and one token of lookahead (`peek`). Comment
//! and plain end-of-line tokens never reach the grammar rules, and elided semicolons arrive as
//! ordinary `Semicolon` tokens.
//!
//! Grammar rules live in submodules, one `impl` block each:
//! - `typeref`: type references
//! - `params`: parameter lists and signatures
//! - `decl`: function/method declarations and the file rule
//! - `expr`: constant expressions (array lengths)
//! - `block`: function bodies

mod block;
mod decl;
mod expr;
mod params;
mod typeref;

use std::io::BufRead;
use std::sync::Arc;

use crate::ast::Ident;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::options::ParseOptions;
use crate::position::Span;
use crate::token::{Token, TokenKind};

pub struct Parser<R> {
    lexer: Lexer<R>,
    tok: Token,
    peek: Token,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<&'a [u8]> {
    pub fn from_source(
        src: &'a str,
        filename: impl Into<Arc<str>>,
        options: ParseOptions,
    ) -> Result<Self> {
        Self::new(Lexer::from_source(src, filename)?, options)
    }
}

impl<R: BufRead> Parser<R> {
    pub fn new(mut lexer: Lexer<R>, options: ParseOptions) -> Result<Self> {
        let start = lexer.position().clone();
        let tok = Token::new(
            start,
            TokenKind::EndOfFile,
            Span::default(),
            String::new(),
            0,
            None,
        );
        let peek = Self::pull(&mut lexer)?;
        Ok(Self {
            lexer,
            tok,
            peek,
            depth: 0,
            options,
        })
    }

    /// The lookahead token.
    #[inline]
    pub fn peek(&self) -> &Token {
        &self.peek
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    // -------------------------------------------------------------------------
    // Token window
    // -------------------------------------------------------------------------

    // Next significant token: comments and bare line ends are dropped, elided semicolons become
    // plain ones.
    fn pull(lexer: &mut Lexer<R>) -> Result<Token> {
        loop {
            let tok = lexer.next_token()?;
            match tok.kind {
                TokenKind::LineComment | TokenKind::BlockComment | TokenKind::EndOfLine => continue,
                TokenKind::ElidedSemicolon => return Ok(tok.with_kind(TokenKind::Semicolon)),
                _ => return Ok(tok),
            }
        }
    }

    /// Shifts the lookahead into `tok` and refills it.
    fn advance(&mut self) -> Result<()> {
        let next = Self::pull(&mut self.lexer)?;
        self.tok = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    #[inline]
    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances iff the lookahead is `kind`.
    pub(crate) fn consume_if(&mut self, kind: TokenKind) -> Result<bool> {
        if self.peek_is(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Advances if the lookahead is one of `kinds`, else fails at the lookahead.
    pub(crate) fn require(&mut self, message: &str, kinds: &[TokenKind]) -> Result<()> {
        if kinds.contains(&self.peek.kind) {
            self.advance()
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Like `require(message, &[Semicolon])`, except that an upcoming `)` or `}` also counts.
    ///
    /// The closer is not consumed: `tok` becomes a semicolon copy of it.
    pub(crate) fn require_statement_terminator(&mut self, message: &str) -> Result<()> {
        if matches!(self.peek.kind, TokenKind::RParen | TokenKind::RBrace) {
            self.tok = self.peek.with_kind(TokenKind::Semicolon);
            return Ok(());
        }
        self.require(message, &[TokenKind::Semicolon])
    }

    pub(crate) fn unexpected(&self, message: &str) -> Error {
        let found = match self.peek.kind {
            // Elided at a line feed, or at end of input.
            TokenKind::Semicolon if self.peek.text() != ";" => {
                if self.peek.raw_text.contains('\n') || !self.lexer.input_exhausted() {
                    "newline".to_owned()
                } else {
                    TokenKind::EndOfFile.to_string()
                }
            }
            TokenKind::Identifier => format!("identifier {}", self.peek.text()),
            kind if kind.is_literal() => format!("literal {}", self.peek.text()),
            kind => kind.to_string(),
        };
        Error::syntax(&self.peek.pos, format!("{message}, found {found}"))
    }

    /// Runs a recursive rule one level deeper, failing instead of exceeding the depth limit.
    pub(crate) fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let limit = self.options.max_nesting_depth;
        if self.depth >= limit {
            return Err(Error::TooDeep {
                pos: self.peek.pos.clone(),
                limit,
            });
        }
        self.depth += 1;
        let out = rule(self);
        self.depth -= 1;
        out
    }

    // -------------------------------------------------------------------------
    // Identifiers
    // -------------------------------------------------------------------------

    pub fn parse_identifier(&mut self) -> Result<Ident> {
        self.parse_identifier_or("expected identifier")
    }

    pub(crate) fn parse_identifier_or(&mut self, message: &str) -> Result<Ident> {
        self.require(message, &[TokenKind::Identifier])?;
        Ok(Ident {
            name: self.tok.text().to_owned(),
            pos: self.tok.pos.clone(),
        })
    }
}

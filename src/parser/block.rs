use std::io::BufRead;

use super::Parser;
use crate::ast::Block;
use crate::error::{Error, Result};
use crate::token::TokenKind;

impl<R: BufRead> Parser<R> {
    /// `{ ... }` kept as the balanced token sequence between the braces.
    ///
    /// Statements are not parsed; only brace balance is checked.
    pub fn parse_block(&mut self) -> Result<Block> {
        self.require("expected '{' to start block", &[TokenKind::LBrace])?;
        let begin = self.tok.pos.clone();
        let limit = self.options.max_nesting_depth;

        let mut open = 0usize;
        let mut tokens = Vec::new();
        loop {
            match self.peek.kind {
                TokenKind::EndOfFile => {
                    return Err(Error::syntax(
                        &self.peek.pos,
                        format!("unexpected EOF, block opened at {begin} is not closed"),
                    ))
                }
                TokenKind::LBrace if self.depth + open >= limit => {
                    return Err(Error::TooDeep {
                        pos: self.peek.pos.clone(),
                        limit,
                    })
                }
                TokenKind::LBrace => open += 1,
                TokenKind::RBrace if open == 0 => break,
                TokenKind::RBrace => open -= 1,
                _ => {}
            }
            self.advance()?;
            tokens.push(self.tok.clone());
        }
        self.require("expected '}' to close block", &[TokenKind::RBrace])?;

        Ok(Block {
            begin,
            tokens,
            end: self.tok.end(),
        })
    }
}

//! Go source front end: a character-level lexer with automatic semicolon insertion and a
//! recursive-descent parser for type references, signatures and function declarations.
//!
//! - The lexer pulls UTF-8 from any `BufRead`, one decoded character at a time, and builds exact
//!   literal values (arbitrary-precision integers and rationals, decoded runes and strings).
//! - The parser keeps one token of lookahead and resolves the named/unnamed parameter-list
//!   ambiguity after the whole list is read.
//! - Function bodies are kept as balanced token sequences; `const`, `type` and `var`
//!   declarations are reported as unsupported.

pub mod ast;
pub mod decoder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod position;
pub mod token;
pub mod walk;

use std::io::BufRead;
use std::sync::Arc;

// Re-exports for convenience
pub use error::{Diag, DiagKind, Error, LexError, LexErrorKind, Result};
pub use lexer::Lexer;
pub use options::ParseOptions;
pub use parser::Parser;
pub use position::{Position, Span};
pub use token::{LiteralValue, Token, TokenCategory, TokenKind};

use crate::ast::File;

/// Parses a whole Go source file held in memory.
pub fn parse_source(
    src: &str,
    filename: impl Into<Arc<str>>,
    options: ParseOptions,
) -> Result<File> {
    Parser::from_source(src, filename, options)?.parse_file()
}

/// Parses a whole Go source file read from `reader`.
pub fn parse_reader<R: BufRead>(
    reader: R,
    filename: impl Into<Arc<str>>,
    options: ParseOptions,
) -> Result<File> {
    Parser::new(Lexer::new(reader, filename)?, options)?.parse_file()
}

/// Lexes `src` completely, `EndOfFile` token included.
pub fn tokenize(src: &str, filename: impl Into<Arc<str>>) -> Result<Vec<Token>> {
    Lexer::from_source(src, filename)?.collect()
}

use thiserror::Error;

use crate::position::Position;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Syntax,
    Internal,
    Unsupported,
}

/// Flattened form of an [`Error`] for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub pos: Position,
    pub message: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,
    #[error("invalid NUL character")]
    NulCharacter,
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid numeric literal: {0}")]
    InvalidNumber(&'static str),
    #[error("invalid escape sequence: {0}")]
    InvalidEscape(&'static str),
    #[error("escape sequence is an invalid Unicode code point")]
    InvalidCodePoint,
    #[error("newline in {0} literal")]
    NewlineInLiteral(&'static str),
    #[error("unterminated {0}")]
    Unterminated(&'static str),
    #[error("rune literal must contain exactly one character")]
    InvalidRune,
    #[error("read failed: {0}")]
    Read(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{pos}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: Position,
}

impl LexError {
    #[inline]
    pub fn new(kind: LexErrorKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            pos: self.pos.clone(),
            message: self.kind.to_string(),
        }
    }
}

/// Every failure the lexer and parser can report. The first one aborts the parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The lookahead token is not one the current rule accepts.
    #[error("{pos}: syntax error: {message}")]
    Syntax { pos: Position, message: String },

    /// A defect in the lexer or parser, not in the input.
    #[error("{pos}: internal error: {message}")]
    Internal { pos: Position, message: String },

    /// A top-level `const`, `type` or `var` declaration.
    #[error("{pos}: unsupported declaration `{keyword}`")]
    Unsupported { pos: Position, keyword: &'static str },

    #[error("{pos}: nesting depth exceeds {limit}")]
    TooDeep { pos: Position, limit: usize },
}

impl Error {
    pub(crate) fn syntax(pos: &Position, message: impl Into<String>) -> Self {
        Error::Syntax {
            pos: pos.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn internal(pos: &Position, message: impl Into<String>) -> Self {
        Error::Internal {
            pos: pos.clone(),
            message: message.into(),
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            Error::Lex(e) => &e.pos,
            Error::Syntax { pos, .. }
            | Error::Internal { pos, .. }
            | Error::Unsupported { pos, .. }
            | Error::TooDeep { pos, .. } => pos,
        }
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal { .. })
    }

    pub fn kind(&self) -> DiagKind {
        match self {
            Error::Lex(_) => DiagKind::Lex,
            Error::Syntax { .. } | Error::TooDeep { .. } => DiagKind::Syntax,
            Error::Internal { .. } => DiagKind::Internal,
            Error::Unsupported { .. } => DiagKind::Unsupported,
        }
    }

    pub fn diag(&self) -> Diag {
        match self {
            Error::Lex(e) => e.diag(),
            Error::Syntax { message, .. } | Error::Internal { message, .. } => Diag {
                kind: self.kind(),
                pos: self.position().clone(),
                message: message.clone(),
            },
            Error::Unsupported { keyword, .. } => Diag {
                kind: DiagKind::Unsupported,
                pos: self.position().clone(),
                message: format!("`{keyword}` declarations are not supported"),
            },
            Error::TooDeep { limit, .. } => Diag {
                kind: DiagKind::Syntax,
                pos: self.position().clone(),
                message: format!("nesting depth exceeds {limit}"),
            },
        }
    }
}

//! Source locations.
//!
//! [`Position`] is the human-facing location (file, 1-based line and column, counted in
//! decoded characters). [`Span`] is the byte range of a token's significant text.

use std::fmt;
use std::sync::Arc;

/// File name, line and column of a decoded character.
///
/// Only the character decoder advances a position; everything downstream clones it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub filename: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position of the first character of `filename`.
    pub fn start(filename: impl Into<Arc<str>>) -> Self {
        Self {
            filename: filename.into(),
            line: 1,
            column: 1,
        }
    }

    /// Steps past `consumed`: a line feed starts a new line, anything else moves one column.
    #[inline]
    pub(crate) fn advance(&mut self, consumed: char) {
        if consumed == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// This position moved `n` single-width characters to the right.
    ///
    /// Used to derive the end of fixed-width tokens (delimiters, identifiers) from their start.
    #[inline]
    pub fn moved(&self, n: usize) -> Self {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        Self {
            filename: Arc::clone(&self.filename),
            line: self.line,
            column: self.column.saturating_add(n),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Compact byte range into the input.
///
/// Offsets are stored as `u32`; inputs beyond 4GiB saturate rather than wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let s = if start > u32::MAX as usize {
            u32::MAX
        } else {
            start as u32
        };
        let e = if end > u32::MAX as usize {
            u32::MAX
        } else {
            end as u32
        };
        Self { start: s, end: e }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut p = Position::start("a.go");
        p.advance('x');
        p.advance('y');
        assert_eq!((p.line, p.column), (1, 3));
        p.advance('\n');
        assert_eq!((p.line, p.column), (2, 1));
    }

    #[test]
    fn moved_keeps_line() {
        let p = Position::start("a.go").moved(4);
        assert_eq!((p.line, p.column), (1, 5));
        assert_eq!(p.to_string(), "a.go:1:5");
    }

    #[test]
    fn span_saturates() {
        let s = Span::new(3, usize::MAX);
        assert_eq!(s.start, 3);
        assert_eq!(s.end, u32::MAX);
        assert!(Span::empty_at(7).is_empty());
    }
}

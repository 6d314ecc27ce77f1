//! Hand-written maximal-munch lexer with automatic semicolon insertion.
//!
//! The lexer pulls decoded characters from a [`CharDecoder`] and produces one [`Token`] per
//! [`Lexer::next_token`] call. Every consumed character, including skipped whitespace, lands in
//! exactly one token's `raw_text`, so concatenating the raw text of a token stream reproduces the
//! input.

use std::io::BufRead;
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::trace;

use crate::decoder::CharDecoder;
use crate::error::{Error, LexError, LexErrorKind, Result};
use crate::position::{Position, Span};
use crate::token::{LiteralValue, Token, TokenKind};

// Larger decimal exponents are rejected so literal construction stays bounded.
const MAX_DECIMAL_EXPONENT: i64 = 100_000;

// =============================================================================
// Character classes
// =============================================================================

#[inline(always)]
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[inline(always)]
fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_continue(c)
}

#[inline(always)]
const fn is_horizontal_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

// `_` must sit between two digits, or right after a base prefix.
fn separators_well_placed(lit: &str, radix: u32) -> bool {
    let bytes = lit.as_bytes();
    let is_digit = |b: u8| (b as char).is_digit(radix.max(10));
    bytes.iter().enumerate().all(|(i, &b)| {
        if b != b'_' {
            return true;
        }
        let prev_ok = i > 0
            && (is_digit(bytes[i - 1])
                || (i == 2 && matches!(bytes[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O')));
        let next_ok = bytes.get(i + 1).is_some_and(|&n| is_digit(n));
        prev_ok && next_ok
    })
}

// =============================================================================
// Literal values
// =============================================================================

/// Exact value of a decimal float mantissa/exponent such as `314.15e-2` (separators removed).
fn decimal_value(digits: &str, pos: &Position) -> Result<BigRational> {
    let (mantissa, exponent) = match digits.find(|c| c == 'e' || c == 'E') {
        Some(at) => (&digits[..at], &digits[at + 1..]),
        None => (digits, ""),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let exponent: i64 = if exponent.is_empty() {
        0
    } else {
        match exponent.parse::<i64>() {
            Ok(e) if e.abs() <= MAX_DECIMAL_EXPONENT => e,
            _ => {
                return Err(LexError::new(
                    LexErrorKind::InvalidNumber("exponent too large"),
                    pos.clone(),
                )
                .into())
            }
        }
    };

    let all_digits = format!("{int_part}{frac_part}");
    let all_digits = if all_digits.is_empty() { "0" } else { &all_digits };
    let numer = BigInt::parse_bytes(all_digits.as_bytes(), 10).ok_or_else(|| {
        Error::internal(pos, format!("float literal {digits:?} failed to convert"))
    })?;

    let scale = exponent - frac_part.len() as i64;
    let ten = BigInt::from(10u8);
    let value = if scale >= 0 {
        BigRational::from_integer(numer * num_traits::pow(ten, scale as usize))
    } else {
        BigRational::new(numer, num_traits::pow(ten, scale.unsigned_abs() as usize))
    };
    Ok(value)
}

fn integer_value(digits: &str, radix: u32, pos: &Position) -> Result<BigInt> {
    let digits = if digits.is_empty() { "0" } else { digits };
    BigInt::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| {
        Error::internal(
            pos,
            format!("integer literal {digits:?} failed to convert in base {radix}"),
        )
    })
}

// =============================================================================
// Lexer
// =============================================================================

pub struct Lexer<R> {
    dec: CharDecoder<R>,
    can_elide_semicolon: bool,
    // Second `.` of `..`, or the synthetic line feed after a multi-line block comment.
    pending: Option<Token>,
    // Everything consumed since the previous token was produced.
    text: String,
    trivia: usize,
    start: Position,
    start_offset: usize,
    at_eof: bool,
}

impl<'a> Lexer<&'a [u8]> {
    pub fn from_source(src: &'a str, filename: impl Into<Arc<str>>) -> Result<Self> {
        Self::new(src.as_bytes(), filename)
    }
}

impl<R: BufRead> Lexer<R> {
    pub fn new(src: R, filename: impl Into<Arc<str>>) -> Result<Self> {
        let dec = CharDecoder::new(src, filename)?;
        let start = dec.position().clone();
        Ok(Self {
            dec,
            can_elide_semicolon: false,
            pending: None,
            text: String::new(),
            trivia: 0,
            start,
            start_offset: 0,
            at_eof: false,
        })
    }

    /// Position of the next unconsumed character.
    #[inline]
    pub fn position(&self) -> &Position {
        self.dec.position()
    }

    /// Whether an `EndOfFile` token has been handed out.
    #[inline]
    pub fn at_eof(&self) -> bool {
        self.at_eof
    }

    /// Whether every input character has been consumed and nothing is queued.
    #[inline]
    pub(crate) fn input_exhausted(&self) -> bool {
        self.pending.is_none() && self.dec.current().is_none()
    }

    /// Produces the next token. After `EndOfFile` every further call yields `EndOfFile` again.
    pub fn next_token(&mut self) -> Result<Token> {
        let tok = match self.pending.take() {
            Some(tok) => tok,
            None => self.scan()?,
        };

        if !tok.is_comment() {
            self.can_elide_semicolon = tok.kind.elides_semicolon();
        }
        if tok.kind == TokenKind::EndOfFile {
            self.at_eof = true;
        }

        trace!(
            kind = %tok.kind,
            line = tok.pos.line,
            column = tok.pos.column,
            "token"
        );
        Ok(tok)
    }

    // -------------------------------------------------------------------------
    // Character plumbing
    // -------------------------------------------------------------------------

    #[inline(always)]
    fn cur(&self) -> Option<char> {
        self.dec.current()
    }

    #[inline]
    fn bump(&mut self) -> Result<Option<char>, LexError> {
        let consumed = self.dec.bump()?;
        if let Some(c) = consumed {
            self.text.push(c);
        }
        Ok(consumed)
    }

    /// Consumes `c` if it is the current character.
    #[inline]
    fn eat(&mut self, c: char) -> Result<bool, LexError> {
        if self.cur() == Some(c) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.dec.position().clone())
    }

    #[inline]
    fn error_at_start(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.start.clone())
    }

    /// Significant text of the token under construction.
    #[inline]
    fn lexeme(&self) -> &str {
        &self.text[self.trivia..]
    }

    fn mark(&mut self) {
        self.trivia = self.text.len();
        self.start = self.dec.position().clone();
        self.start_offset = self.dec.offset();
    }

    fn finish(&mut self, kind: TokenKind, payload: Option<LiteralValue>) -> Token {
        let raw_text = std::mem::take(&mut self.text);
        Token::new(
            self.start.clone(),
            kind,
            Span::new(self.start_offset, self.dec.offset()),
            raw_text,
            self.trivia,
            payload,
        )
    }

    fn line_end_kind(&self) -> TokenKind {
        if self.can_elide_semicolon {
            TokenKind::ElidedSemicolon
        } else {
            TokenKind::EndOfLine
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    fn scan(&mut self) -> Result<Token> {
        while let Some(c) = self.cur() {
            let leading_bom = c == '\u{feff}' && self.dec.offset() == 0;
            if !is_horizontal_space(c) && !leading_bom {
                break;
            }
            self.bump()?;
        }
        self.mark();

        let Some(c) = self.bump()? else {
            let kind = if self.can_elide_semicolon {
                TokenKind::ElidedSemicolon
            } else {
                TokenKind::EndOfFile
            };
            return Ok(self.finish(kind, None));
        };

        use TokenKind::*;
        let kind = match c {
            '\n' => self.line_end_kind(),

            '+' => {
                if self.eat('+')? {
                    IncrementOp
                } else if self.eat('=')? {
                    AddAssignOp
                } else {
                    AddOp
                }
            }
            '-' => {
                if self.eat('-')? {
                    DecrementOp
                } else if self.eat('=')? {
                    SubAssignOp
                } else {
                    SubOp
                }
            }
            '*' => {
                if self.eat('=')? {
                    MulAssignOp
                } else {
                    MulOp
                }
            }
            '/' => {
                if self.eat('/')? {
                    return self.lex_line_comment();
                } else if self.eat('*')? {
                    return self.lex_block_comment();
                } else if self.eat('=')? {
                    DivAssignOp
                } else {
                    DivOp
                }
            }
            '%' => {
                if self.eat('=')? {
                    ModAssignOp
                } else {
                    ModOp
                }
            }
            '&' => {
                if self.eat('^')? {
                    if self.eat('=')? {
                        BitClearAssignOp
                    } else {
                        BitClearOp
                    }
                } else if self.eat('=')? {
                    BitAndAssignOp
                } else if self.eat('&')? {
                    LogicAndOp
                } else {
                    BitAndOp
                }
            }
            '|' => {
                if self.eat('=')? {
                    BitOrAssignOp
                } else if self.eat('|')? {
                    LogicOrOp
                } else {
                    BitOrOp
                }
            }
            '^' => {
                if self.eat('=')? {
                    BitXorAssignOp
                } else {
                    BitXorOp
                }
            }
            '<' => {
                if self.eat('-')? {
                    ChanOp
                } else if self.eat('=')? {
                    LteOp
                } else if self.eat('<')? {
                    if self.eat('=')? {
                        ShlAssignOp
                    } else {
                        ShlOp
                    }
                } else {
                    LtOp
                }
            }
            '>' => {
                if self.eat('=')? {
                    GteOp
                } else if self.eat('>')? {
                    if self.eat('=')? {
                        ShrAssignOp
                    } else {
                        ShrOp
                    }
                } else {
                    GtOp
                }
            }
            '=' => {
                if self.eat('=')? {
                    EqOp
                } else {
                    AssignOp
                }
            }
            '!' => {
                if self.eat('=')? {
                    NeqOp
                } else {
                    LogicNotOp
                }
            }
            ':' => {
                if self.eat('=')? {
                    DefineOp
                } else {
                    Colon
                }
            }
            '~' => TildeOp,
            '.' => {
                if self.cur().is_some_and(|d| d.is_ascii_digit()) {
                    return self.lex_number('.');
                }
                if !self.eat('.')? {
                    Dot
                } else if self.eat('.')? {
                    EllipsisOp
                } else {
                    return Ok(self.split_double_dot());
                }
            }
            '(' => LParen,
            ')' => RParen,
            '[' => LBracket,
            ']' => RBracket,
            '{' => LBrace,
            '}' => RBrace,
            ',' => Comma,
            ';' => Semicolon,

            '\'' => return self.lex_rune(),
            '"' => return self.lex_string(),
            '`' => return self.lex_raw_string(),

            '0'..='9' => return self.lex_number(c),
            c if is_ident_start(c) => return self.lex_identifier(),

            c => return Err(self.error_at_start(LexErrorKind::InvalidCharacter(c)).into()),
        };

        Ok(self.finish(kind, None))
    }

    // `..` is not an operator: hand out one `Dot` now and queue the second.
    fn split_double_dot(&mut self) -> Token {
        self.text.pop();
        let second_pos = self.start.moved(1);
        let second_offset = self.start_offset + 1;

        let mut first = self.finish(TokenKind::Dot, None);
        first.span = Span::new(self.start_offset, second_offset);
        self.pending = Some(Token::new(
            second_pos,
            TokenKind::Dot,
            Span::new(second_offset, second_offset + 1),
            ".".to_owned(),
            0,
            None,
        ));
        first
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    fn lex_line_comment(&mut self) -> Result<Token> {
        while self.cur().is_some_and(|c| c != '\n') {
            self.bump()?;
        }
        Ok(self.finish(TokenKind::LineComment, None))
    }

    fn lex_block_comment(&mut self) -> Result<Token> {
        let mut spans_lines = false;
        loop {
            match self.bump()? {
                None => {
                    return Err(self
                        .error_at_start(LexErrorKind::Unterminated("comment"))
                        .into())
                }
                Some('*') => {
                    if self.eat('/')? {
                        break;
                    }
                }
                Some('\n') => spans_lines = true,
                Some(_) => {}
            }
        }

        let tok = self.finish(TokenKind::BlockComment, None);
        if spans_lines {
            // A multi-line comment acts as a line feed for semicolon insertion.
            self.pending = Some(Token::new(
                self.dec.position().clone(),
                self.line_end_kind(),
                Span::empty_at(self.dec.offset()),
                String::new(),
                0,
                None,
            ));
        }
        Ok(tok)
    }

    // -------------------------------------------------------------------------
    // Identifiers
    // -------------------------------------------------------------------------

    fn lex_identifier(&mut self) -> Result<Token> {
        while self.cur().is_some_and(is_ident_continue) {
            self.bump()?;
        }
        match TokenKind::keyword(self.lexeme()) {
            Some(kw) => Ok(self.finish(kw, None)),
            None => {
                let name = self.lexeme().to_owned();
                Ok(self.finish(TokenKind::Identifier, Some(LiteralValue::Str(name))))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Numbers
    // -------------------------------------------------------------------------

    /// Counts digits of `radix` (separators are consumed but not counted).
    fn scan_digits(&mut self, radix: u32) -> Result<usize, LexError> {
        let mut n = 0;
        while let Some(c) = self.cur() {
            if c.is_digit(radix) {
                n += 1;
            } else if c != '_' {
                break;
            }
            self.bump()?;
        }
        Ok(n)
    }

    fn invalid_number(&self, why: &'static str) -> Error {
        self.error_at_start(LexErrorKind::InvalidNumber(why)).into()
    }

    /// `first` is already consumed. For `.` the current character is a digit.
    fn lex_number(&mut self, first: char) -> Result<Token> {
        use TokenKind::*;

        let prefix = match (first, self.cur()) {
            ('0', Some('x' | 'X')) => Some((HexIntegerLiteral, 16)),
            ('0', Some('b' | 'B')) => Some((BinaryIntegerLiteral, 2)),
            ('0', Some('o' | 'O')) => Some((OctalIntegerLiteral, 8)),
            _ => None,
        };

        let (mut kind, radix) = match prefix {
            Some((kind, radix)) => {
                self.bump()?;
                // Scan decimal digits for binary and octal so stray digits are reported here.
                if self.scan_digits(radix.max(10))? == 0 {
                    return Err(self.invalid_number(match radix {
                        16 => "hexadecimal literal has no digits",
                        8 => "octal literal has no digits",
                        _ => "binary literal has no digits",
                    }));
                }
                let digits_ok = self.lexeme()[2..]
                    .chars()
                    .all(|c| c == '_' || c.is_digit(radix));
                if !digits_ok {
                    return Err(self.invalid_number(match radix {
                        8 => "invalid digit in octal literal",
                        _ => "invalid digit in binary literal",
                    }));
                }
                (kind, radix)
            }
            None => {
                let mut is_float = first == '.';
                if is_float {
                    self.scan_digits(10)?;
                } else {
                    self.scan_digits(10)?;
                    if self.eat('.')? {
                        is_float = true;
                        self.scan_digits(10)?;
                    }
                }
                if matches!(self.cur(), Some('e' | 'E')) {
                    self.bump()?;
                    is_float = true;
                    if matches!(self.cur(), Some('+' | '-')) {
                        self.bump()?;
                    }
                    if self.scan_digits(10)? == 0 {
                        return Err(self.invalid_number("exponent has no digits"));
                    }
                }

                if is_float {
                    (FloatLiteral, 10)
                } else if first == '0' {
                    (OctalIntegerLiteral, 8)
                } else {
                    (DecimalIntegerLiteral, 10)
                }
            }
        };

        let imaginary = self.eat('i')?;
        let lit = self.lexeme();
        if !separators_well_placed(lit, radix) {
            return Err(self.invalid_number("'_' must separate successive digits"));
        }

        let body = lit.strip_suffix('i').unwrap_or(lit);
        let prefixed = prefix.is_some();
        let digits: String = body
            .get(if prefixed { 2 } else { 0 }..)
            .unwrap_or("")
            .chars()
            .filter(|&c| c != '_')
            .collect();

        // Legacy octal forms are decimal once they carry a fraction, exponent or `i`.
        if kind == OctalIntegerLiteral
            && !prefixed
            && !imaginary
            && digits.chars().any(|c| !c.is_digit(8))
        {
            return Err(self.invalid_number("invalid digit in octal literal"));
        }

        let pos = self.start.clone();
        let payload = if imaginary {
            let value = match kind {
                FloatLiteral => decimal_value(&digits, &pos)?,
                _ if prefixed => BigRational::from_integer(integer_value(&digits, radix, &pos)?),
                _ => BigRational::from_integer(integer_value(&digits, 10, &pos)?),
            };
            kind = ImaginaryLiteral;
            LiteralValue::Imaginary(value)
        } else if kind == FloatLiteral {
            LiteralValue::Float(decimal_value(&digits, &pos)?)
        } else {
            LiteralValue::Int(integer_value(&digits, radix, &pos)?)
        };

        Ok(self.finish(kind, Some(payload)))
    }

    // -------------------------------------------------------------------------
    // Runes and strings
    // -------------------------------------------------------------------------

    /// Reads one possibly escaped character of a quoted literal.
    fn read_char(&mut self) -> Result<char, LexError> {
        match self.bump()? {
            Some('\\') => self.read_escape(),
            Some(c) => Ok(c),
            None => Err(self.error_at_start(LexErrorKind::Unterminated("literal"))),
        }
    }

    fn read_escape(&mut self) -> Result<char, LexError> {
        let Some(c) = self.bump()? else {
            return Err(self.error_at_start(LexErrorKind::Unterminated("escape sequence")));
        };
        let value = match c {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            '\\' | '\'' | '"' => c,
            'x' => self.read_hex_escape(2)?,
            'u' => self.read_hex_escape(4)?,
            'U' => self.read_hex_escape(8)?,
            '0'..='7' => {
                let mut value = c as u32 - '0' as u32;
                for _ in 0..2 {
                    match self.cur().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            self.bump()?;
                            value = value * 8 + d;
                        }
                        None => {
                            return Err(self.error(LexErrorKind::InvalidEscape(
                                "octal escape needs exactly three digits",
                            )))
                        }
                    }
                }
                if value > 255 {
                    return Err(self.error(LexErrorKind::InvalidEscape(
                        "octal escape value above 255",
                    )));
                }
                char::from_u32(value).ok_or_else(|| self.error(LexErrorKind::InvalidCodePoint))?
            }
            _ => {
                return Err(self.error(LexErrorKind::InvalidEscape("unknown escape sequence")))
            }
        };
        Ok(value)
    }

    fn read_hex_escape(&mut self, len: usize) -> Result<char, LexError> {
        let mut value = 0u32;
        for _ in 0..len {
            match self.cur() {
                Some(c) => match c.to_digit(16) {
                    Some(d) => {
                        self.bump()?;
                        value = (value << 4) | d;
                    }
                    None => {
                        return Err(self.error(LexErrorKind::InvalidEscape(
                            "invalid hexadecimal digit",
                        )))
                    }
                },
                None => {
                    return Err(self.error_at_start(LexErrorKind::Unterminated("escape sequence")))
                }
            }
        }
        // Rejects surrogates and values above U+10FFFF.
        char::from_u32(value).ok_or_else(|| self.error(LexErrorKind::InvalidCodePoint))
    }

    fn lex_rune(&mut self) -> Result<Token> {
        let value = match self.cur() {
            None => return Err(self.error_at_start(LexErrorKind::Unterminated("rune literal")).into()),
            Some('\n') => return Err(self.error(LexErrorKind::NewlineInLiteral("rune")).into()),
            Some('\'') => return Err(self.error(LexErrorKind::InvalidRune).into()),
            Some(_) => self.read_char()?,
        };
        match self.cur() {
            Some('\'') => {
                self.bump()?;
            }
            None => return Err(self.error_at_start(LexErrorKind::Unterminated("rune literal")).into()),
            Some('\n') => return Err(self.error(LexErrorKind::NewlineInLiteral("rune")).into()),
            Some(_) => return Err(self.error(LexErrorKind::InvalidRune).into()),
        }
        Ok(self.finish(TokenKind::RuneLiteral, Some(LiteralValue::Rune(value))))
    }

    fn lex_string(&mut self) -> Result<Token> {
        let mut value = String::new();
        loop {
            match self.cur() {
                None => {
                    return Err(self
                        .error_at_start(LexErrorKind::Unterminated("string literal"))
                        .into())
                }
                Some('\n') => return Err(self.error(LexErrorKind::NewlineInLiteral("string")).into()),
                Some('"') => {
                    self.bump()?;
                    break;
                }
                Some(_) => value.push(self.read_char()?),
            }
        }
        Ok(self.finish(
            TokenKind::InterpretedStringLiteral,
            Some(LiteralValue::Str(value)),
        ))
    }

    fn lex_raw_string(&mut self) -> Result<Token> {
        loop {
            match self.bump()? {
                None => {
                    return Err(self
                        .error_at_start(LexErrorKind::Unterminated("raw string literal"))
                        .into())
                }
                Some('`') => break,
                Some(_) => {}
            }
        }
        let lexeme = self.lexeme();
        let body = lexeme[1..lexeme.len() - 1].to_owned();
        Ok(self.finish(TokenKind::RawStringLiteral, Some(LiteralValue::Str(body))))
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<Token>;

    /// Yields tokens up to and including `EndOfFile`, or up to the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.at_eof {
            return None;
        }
        let item = self.next_token();
        if item.is_err() {
            self.at_eof = true;
        }
        Some(item)
    }
}

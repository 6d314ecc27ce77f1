//! Pull-based UTF-8 decoder over a byte source.
//!
//! Holds exactly one decoded character of lookahead. End of input is `None`.

use std::io::{self, BufRead};
use std::sync::Arc;

use crate::error::{LexError, LexErrorKind};
use crate::position::Position;

// 0 = invalid lead, 1..4 = sequence length (overlong two-byte leads rejected)
const UTF8_LEN: [u8; 256] = {
    let mut t = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        let b = i as u8;
        t[i] = if b < 0x80 {
            1
        } else if b >= 0xC2 && b <= 0xDF {
            2
        } else if b >= 0xE0 && b <= 0xEF {
            3
        } else if b >= 0xF0 && b <= 0xF4 {
            4
        } else {
            0
        };
        i += 1;
    }
    t
};

const UTF8_FIRST_MASK: [u8; 5] = [0, 0x7F, 0x1F, 0x0F, 0x07];

// Bounds on the second byte: rejects overlong forms, surrogates and values above U+10FFFF.
const UTF8_B1_MIN: [u8; 256] = {
    let mut t = [0x80u8; 256];
    t[0xE0] = 0xA0;
    t[0xF0] = 0x90;
    t
};

const UTF8_B1_MAX: [u8; 256] = {
    let mut t = [0xBFu8; 256];
    t[0xED] = 0x9F;
    t[0xF4] = 0x8F;
    t
};

#[inline(always)]
const fn is_utf8_cont(b: u8) -> bool {
    (b & 0xC0) == 0x80
}

pub struct CharDecoder<R> {
    src: R,
    ch: Option<char>,
    width: usize,
    pos: Position,
    offset: usize,
}

impl<R: BufRead> CharDecoder<R> {
    /// Decodes the first character of `src` eagerly.
    pub fn new(src: R, filename: impl Into<Arc<str>>) -> Result<Self, LexError> {
        let mut dec = Self {
            src,
            ch: None,
            width: 0,
            pos: Position::start(filename),
            offset: 0,
        };
        let (ch, width) = dec.decode()?;
        dec.ch = ch;
        dec.width = width;
        Ok(dec)
    }

    /// The current, not yet consumed, character.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.ch
    }

    /// Position of the current character.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Byte offset of the current character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Consumes the current character and decodes the next one.
    ///
    /// Returns the consumed character, or `None` at end of input (where it is a no-op).
    pub fn bump(&mut self) -> Result<Option<char>, LexError> {
        let Some(consumed) = self.ch else {
            return Ok(None);
        };
        // A leading byte order mark takes no column.
        if !(consumed == '\u{feff}' && self.offset == 0) {
            self.pos.advance(consumed);
        }
        self.offset += self.width;

        let (ch, width) = self.decode()?;
        self.ch = ch;
        self.width = width;
        Ok(Some(consumed))
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.pos.clone())
    }

    fn next_byte(&mut self) -> Result<Option<u8>, LexError> {
        loop {
            let buf = match self.src.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(LexError::new(
                        LexErrorKind::Read(e.to_string()),
                        self.pos.clone(),
                    ))
                }
            };
            let Some(&b) = buf.first() else {
                return Ok(None);
            };
            self.src.consume(1);
            return Ok(Some(b));
        }
    }

    fn decode(&mut self) -> Result<(Option<char>, usize), LexError> {
        let Some(first) = self.next_byte()? else {
            return Ok((None, 0));
        };

        let len = UTF8_LEN[first as usize] as usize;
        match len {
            0 => return Err(self.error(LexErrorKind::InvalidUtf8)),
            1 if first == 0 => return Err(self.error(LexErrorKind::NulCharacter)),
            1 => return Ok((Some(first as char), 1)),
            _ => {}
        }

        let mut cp = (first & UTF8_FIRST_MASK[len]) as u32;
        for i in 1..len {
            let Some(b) = self.next_byte()? else {
                return Err(self.error(LexErrorKind::InvalidUtf8));
            };
            let in_range = i > 1
                || (UTF8_B1_MIN[first as usize]..=UTF8_B1_MAX[first as usize]).contains(&b);
            if !is_utf8_cont(b) || !in_range {
                return Err(self.error(LexErrorKind::InvalidUtf8));
            }
            cp = (cp << 6) | (b & 0x3F) as u32;
        }

        match char::from_u32(cp) {
            Some(c) => Ok((Some(c), len)),
            None => Err(self.error(LexErrorKind::InvalidUtf8)),
        }
    }
}

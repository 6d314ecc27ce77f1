//! Token kinds, payloads and the token record produced by the lexer.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::position::{Position, Span};

// =============================================================================
// Token kinds
// =============================================================================

/// Closed set of token kinds, laid out in contiguous categories.
///
/// Category membership is a range test on the discriminant; keep each category's variants
/// between its first and last member when editing.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[rustfmt::skip]
pub enum TokenKind {
    EndOfFile,

    // Comments
    LineComment,
    BlockComment,

    Identifier,

    // Keywords
    BreakKeyword,
    CaseKeyword,
    ChanKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DeferKeyword,
    ElseKeyword,
    FallthroughKeyword,
    ForKeyword,
    FuncKeyword,
    GoKeyword,
    GotoKeyword,
    IfKeyword,
    ImportKeyword,
    InterfaceKeyword,
    MapKeyword,
    PackageKeyword,
    RangeKeyword,
    ReturnKeyword,
    SelectKeyword,
    StructKeyword,
    SwitchKeyword,
    TypeKeyword,
    VarKeyword,

    // Operators
    AddOp,      // +
    SubOp,      // -
    MulOp,      // *
    DivOp,      // /
    ModOp,      // %
    BitAndOp,   // &
    BitOrOp,    // |
    BitXorOp,   // ^
    ShlOp,      // <<
    ShrOp,      // >>
    BitClearOp, // &^

    // Assignment operators (a sub-range of the operators)
    DefineOp,         // :=
    AssignOp,         // =
    AddAssignOp,      // +=
    SubAssignOp,      // -=
    MulAssignOp,      // *=
    DivAssignOp,      // /=
    ModAssignOp,      // %=
    BitAndAssignOp,   // &=
    BitOrAssignOp,    // |=
    BitXorAssignOp,   // ^=
    ShlAssignOp,      // <<=
    ShrAssignOp,      // >>=
    BitClearAssignOp, // &^=

    LogicNotOp,  // !
    LogicAndOp,  // &&
    LogicOrOp,   // ||
    LtOp,        // <
    GtOp,        // >
    EqOp,        // ==
    NeqOp,       // !=
    LteOp,       // <=
    GteOp,       // >=
    ChanOp,      // <-
    IncrementOp, // ++
    DecrementOp, // --
    EllipsisOp,  // ...
    TildeOp,     // ~

    // Delimiters
    EndOfLine,
    ElidedSemicolon,
    Semicolon,
    LParen,
    LBracket,
    LBrace,
    RParen,
    RBracket,
    RBrace,
    Comma,
    Dot,
    Colon,

    // Literals
    DecimalIntegerLiteral,
    OctalIntegerLiteral,
    HexIntegerLiteral,
    BinaryIntegerLiteral,
    FloatLiteral,
    ImaginaryLiteral,
    RuneLiteral,
    InterpretedStringLiteral,
    RawStringLiteral,
}

const KIND_COUNT: usize = TokenKind::RawStringLiteral as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    EndOfFile,
    Comment,
    Identifier,
    Keyword,
    Operator,
    Delimiter,
    Literal,
}

macro_rules! gen_lookup_table {
    (bool, $($variant:ident),* $(,)?) => {{
        let mut table = [false; KIND_COUNT];
        $(table[TokenKind::$variant as usize] = true;)*
        table
    }};
}

// Tokens after which a line feed terminates the statement.
const SEMI_INSERT_TABLE: [bool; KIND_COUNT] = gen_lookup_table!(
    bool,
    Identifier,
    DecimalIntegerLiteral,
    OctalIntegerLiteral,
    HexIntegerLiteral,
    BinaryIntegerLiteral,
    FloatLiteral,
    ImaginaryLiteral,
    RuneLiteral,
    InterpretedStringLiteral,
    RawStringLiteral,
    BreakKeyword,
    ContinueKeyword,
    FallthroughKeyword,
    ReturnKeyword,
    IncrementOp,
    DecrementOp,
    RParen,
    RBracket,
    RBrace,
);

impl TokenKind {
    #[inline(always)]
    const fn within(self, first: TokenKind, last: TokenKind) -> bool {
        (self as u8) >= (first as u8) && (self as u8) <= (last as u8)
    }

    #[inline]
    pub const fn is_comment(self) -> bool {
        self.within(TokenKind::LineComment, TokenKind::BlockComment)
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        self.within(TokenKind::BreakKeyword, TokenKind::VarKeyword)
    }

    #[inline]
    pub const fn is_operator(self) -> bool {
        self.within(TokenKind::AddOp, TokenKind::TildeOp)
    }

    #[inline]
    pub const fn is_assign_operator(self) -> bool {
        self.within(TokenKind::DefineOp, TokenKind::BitClearAssignOp)
    }

    #[inline]
    pub const fn is_delimiter(self) -> bool {
        self.within(TokenKind::EndOfLine, TokenKind::Colon)
    }

    #[inline]
    pub const fn is_literal(self) -> bool {
        self.within(TokenKind::DecimalIntegerLiteral, TokenKind::RawStringLiteral)
    }

    #[inline]
    pub const fn is_integer_literal(self) -> bool {
        self.within(TokenKind::DecimalIntegerLiteral, TokenKind::BinaryIntegerLiteral)
    }

    #[inline]
    pub const fn is_string_literal(self) -> bool {
        matches!(
            self,
            TokenKind::InterpretedStringLiteral | TokenKind::RawStringLiteral
        )
    }

    pub const fn category(self) -> TokenCategory {
        if self.is_comment() {
            TokenCategory::Comment
        } else if self.is_keyword() {
            TokenCategory::Keyword
        } else if self.is_operator() {
            TokenCategory::Operator
        } else if self.is_delimiter() {
            TokenCategory::Delimiter
        } else if self.is_literal() {
            TokenCategory::Literal
        } else if matches!(self, TokenKind::Identifier) {
            TokenCategory::Identifier
        } else {
            TokenCategory::EndOfFile
        }
    }

    /// Whether a line feed right after this token becomes an elided semicolon.
    #[inline(always)]
    pub const fn elides_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "break" => TokenKind::BreakKeyword,
            "case" => TokenKind::CaseKeyword,
            "chan" => TokenKind::ChanKeyword,
            "const" => TokenKind::ConstKeyword,
            "continue" => TokenKind::ContinueKeyword,
            "default" => TokenKind::DefaultKeyword,
            "defer" => TokenKind::DeferKeyword,
            "else" => TokenKind::ElseKeyword,
            "fallthrough" => TokenKind::FallthroughKeyword,
            "for" => TokenKind::ForKeyword,
            "func" => TokenKind::FuncKeyword,
            "go" => TokenKind::GoKeyword,
            "goto" => TokenKind::GotoKeyword,
            "if" => TokenKind::IfKeyword,
            "import" => TokenKind::ImportKeyword,
            "interface" => TokenKind::InterfaceKeyword,
            "map" => TokenKind::MapKeyword,
            "package" => TokenKind::PackageKeyword,
            "range" => TokenKind::RangeKeyword,
            "return" => TokenKind::ReturnKeyword,
            "select" => TokenKind::SelectKeyword,
            "struct" => TokenKind::StructKeyword,
            "switch" => TokenKind::SwitchKeyword,
            "type" => TokenKind::TypeKeyword,
            "var" => TokenKind::VarKeyword,
            _ => return None,
        };
        Some(kind)
    }

    #[rustfmt::skip]
    pub const fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            EndOfFile => "EOF",
            LineComment => "// ...",
            BlockComment => "/* ... */",
            Identifier => "identifier",
            BreakKeyword => "break", CaseKeyword => "case", ChanKeyword => "chan",
            ConstKeyword => "const", ContinueKeyword => "continue", DefaultKeyword => "default",
            DeferKeyword => "defer", ElseKeyword => "else", FallthroughKeyword => "fallthrough",
            ForKeyword => "for", FuncKeyword => "func", GoKeyword => "go", GotoKeyword => "goto",
            IfKeyword => "if", ImportKeyword => "import", InterfaceKeyword => "interface",
            MapKeyword => "map", PackageKeyword => "package", RangeKeyword => "range",
            ReturnKeyword => "return", SelectKeyword => "select", StructKeyword => "struct",
            SwitchKeyword => "switch", TypeKeyword => "type", VarKeyword => "var",
            AddOp => "+", SubOp => "-", MulOp => "*", DivOp => "/", ModOp => "%",
            BitAndOp => "&", BitOrOp => "|", BitXorOp => "^", ShlOp => "<<", ShrOp => ">>",
            BitClearOp => "&^",
            DefineOp => ":=", AssignOp => "=", AddAssignOp => "+=", SubAssignOp => "-=",
            MulAssignOp => "*=", DivAssignOp => "/=", ModAssignOp => "%=", BitAndAssignOp => "&=",
            BitOrAssignOp => "|=", BitXorAssignOp => "^=", ShlAssignOp => "<<=",
            ShrAssignOp => ">>=", BitClearAssignOp => "&^=",
            LogicNotOp => "!", LogicAndOp => "&&", LogicOrOp => "||", LtOp => "<", GtOp => ">",
            EqOp => "==", NeqOp => "!=", LteOp => "<=", GteOp => ">=", ChanOp => "<-",
            IncrementOp => "++", DecrementOp => "--", EllipsisOp => "...", TildeOp => "~",
            EndOfLine => "\\n", ElidedSemicolon => "[;]", Semicolon => ";",
            LParen => "(", LBracket => "[", LBrace => "{", RParen => ")", RBracket => "]",
            RBrace => "}", Comma => ",", Dot => ".", Colon => ":",
            DecimalIntegerLiteral => "DecimalIntegerLiteral",
            OctalIntegerLiteral => "OctalIntegerLiteral",
            HexIntegerLiteral => "HexIntegerLiteral",
            BinaryIntegerLiteral => "BinaryIntegerLiteral",
            FloatLiteral => "FloatLiteral",
            ImaginaryLiteral => "ImaginaryLiteral",
            RuneLiteral => "RuneLiteral",
            InterpretedStringLiteral => "InterpretedStringLiteral",
            RawStringLiteral => "RawStringLiteral",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Decoded value attached to literal and identifier tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Int(BigInt),
    Float(BigRational),
    /// Imaginary part of an imaginary literal.
    Imaginary(BigRational),
    Rune(char),
    /// Identifier text, raw string contents, or decoded interpreted string.
    Str(String),
}

impl LiteralValue {
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            LiteralValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            LiteralValue::Float(v) | LiteralValue::Imaginary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            LiteralValue::Rune(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

// =============================================================================
// Token
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Where the token's significant text begins.
    pub pos: Position,
    pub kind: TokenKind,
    /// Byte range of the significant text.
    pub span: Span,
    /// Every byte consumed while producing this token, including the horizontal whitespace
    /// skipped in front of it. Concatenating `raw_text` over a token stream yields the input.
    pub raw_text: String,
    pub payload: Option<LiteralValue>,
    trivia: u32,
}

impl Token {
    pub(crate) fn new(
        pos: Position,
        kind: TokenKind,
        span: Span,
        raw_text: String,
        trivia: usize,
        payload: Option<LiteralValue>,
    ) -> Self {
        Self {
            pos,
            kind,
            span,
            raw_text,
            payload,
            trivia: u32::try_from(trivia).unwrap_or(u32::MAX),
        }
    }

    /// Same token, re-kinded. The parser uses this to turn elided semicolons and closers into
    /// plain semicolons.
    pub(crate) fn with_kind(&self, kind: TokenKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// The token's own text, without leading whitespace.
    #[inline]
    pub fn text(&self) -> &str {
        self.raw_text.get(self.trivia as usize..).unwrap_or("")
    }

    /// Position just past the token, assuming it does not span lines.
    pub fn end(&self) -> Position {
        self.pos.moved(self.text().chars().count())
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind.is_comment()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.pos, self.kind, self.text())
    }
}

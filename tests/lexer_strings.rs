use gofront::{tokenize, Error, LexErrorKind, LiteralValue, TokenKind};

fn rune(input: &str) -> char {
    let toks = tokenize(input, "strings.go")
        .unwrap_or_else(|e| panic!("lex failed for {input:?}: {e}"));
    assert_eq!(toks[0].kind, TokenKind::RuneLiteral, "{input:?}");
    toks[0]
        .payload
        .as_ref()
        .and_then(LiteralValue::as_char)
        .unwrap_or_else(|| panic!("{input:?} has no rune payload"))
}

fn string(input: &str) -> (TokenKind, String) {
    let toks = tokenize(input, "strings.go")
        .unwrap_or_else(|e| panic!("lex failed for {input:?}: {e}"));
    let value = toks[0]
        .payload
        .as_ref()
        .and_then(LiteralValue::as_str)
        .unwrap_or_else(|| panic!("{input:?} has no string payload"))
        .to_owned();
    (toks[0].kind, value)
}

fn lex_error(input: &str) -> LexErrorKind {
    match tokenize(input, "strings.go") {
        Err(Error::Lex(e)) => e.kind,
        other => panic!("{input:?}: expected a lexical error, got {other:?}"),
    }
}

#[test]
fn simple_escapes() {
    assert_eq!(rune(r"'\n'"), '\u{0a}');
    assert_eq!(rune(r"'\a'"), '\u{07}');
    assert_eq!(rune(r"'\b'"), '\u{08}');
    assert_eq!(rune(r"'\f'"), '\u{0c}');
    assert_eq!(rune(r"'\r'"), '\r');
    assert_eq!(rune(r"'\t'"), '\t');
    assert_eq!(rune(r"'\v'"), '\u{0b}');
    assert_eq!(rune(r"'\\'"), '\\');
    assert_eq!(rune(r"'\''"), '\'');
    assert_eq!(rune(r#"'\"'"#), '"');
}

#[test]
fn numeric_escapes() {
    assert_eq!(rune(r"'A'"), 'A');
    assert_eq!(rune(r"'\U0001F600'"), '\u{1F600}');
    assert_eq!(rune(r"'\x41'"), 'A');
    assert_eq!(rune(r"'\xff'"), '\u{ff}');
    assert_eq!(rune(r"'\101'"), 'A');
    assert_eq!(rune(r"'\000'"), '\0');
    assert_eq!(rune(r"'\377'"), '\u{ff}');
}

#[test]
fn plain_runes() {
    assert_eq!(rune("'a'"), 'a');
    assert_eq!(rune("'世'"), '世');
    assert_eq!(rune("' '"), ' ');
}

#[test]
fn interpreted_strings_decode_escapes() {
    assert_eq!(
        string(r#""a\tb\n""#),
        (TokenKind::InterpretedStringLiteral, "a\tb\n".to_owned())
    );
    assert_eq!(string(r#""été""#).1, "été");
    assert_eq!(string(r#""say \"hi\"""#).1, "say \"hi\"");
    assert_eq!(string(r#""it\'s""#).1, "it's");
    assert_eq!(string(r#""""#).1, "");
}

#[test]
fn raw_strings_are_verbatim() {
    assert_eq!(
        string(r"`a\nb`"),
        (TokenKind::RawStringLiteral, r"a\nb".to_owned())
    );
    assert_eq!(string("`line1\nline2`").1, "line1\nline2");
    assert_eq!(string("``").1, "");
}

#[test]
fn raw_string_newlines_advance_position() {
    let toks = tokenize("`a\nb` x", "strings.go").unwrap();
    assert_eq!(toks[1].kind, TokenKind::Identifier);
    assert_eq!((toks[1].pos.line, toks[1].pos.column), (2, 4));
}

#[test]
fn code_points_must_be_valid() {
    assert_eq!(lex_error(r#""\ud800""#), LexErrorKind::InvalidCodePoint);
    assert_eq!(lex_error(r#""\uDFFF""#), LexErrorKind::InvalidCodePoint);
    assert_eq!(lex_error(r"'\U00110000'"), LexErrorKind::InvalidCodePoint);
}

#[test]
fn malformed_escapes() {
    assert!(matches!(lex_error(r#""\q""#), LexErrorKind::InvalidEscape(_)));
    assert!(matches!(lex_error(r"'\x4'"), LexErrorKind::InvalidEscape(_)));
    assert!(matches!(lex_error(r"'\u12G4'"), LexErrorKind::InvalidEscape(_)));
    assert!(matches!(lex_error(r"'\12'"), LexErrorKind::InvalidEscape(_)));
    assert_eq!(
        lex_error(r"'\400'"),
        LexErrorKind::InvalidEscape("octal escape value above 255")
    );
}

#[test]
fn runes_hold_exactly_one_character() {
    assert_eq!(lex_error("''"), LexErrorKind::InvalidRune);
    assert_eq!(lex_error("'ab'"), LexErrorKind::InvalidRune);
}

#[test]
fn newline_inside_quoted_literal() {
    assert_eq!(
        lex_error("\"ab\ncd\""),
        LexErrorKind::NewlineInLiteral("string")
    );
    assert_eq!(lex_error("'\n'"), LexErrorKind::NewlineInLiteral("rune"));
}

#[test]
fn unterminated_literals() {
    assert_eq!(
        lex_error("\"abc"),
        LexErrorKind::Unterminated("string literal")
    );
    assert_eq!(
        lex_error("`abc"),
        LexErrorKind::Unterminated("raw string literal")
    );
    assert_eq!(lex_error("'a"), LexErrorKind::Unterminated("rune literal"));
}

#[test]
fn string_error_position() {
    let err = tokenize("x := \"abc", "strings.go").unwrap_err();
    let pos = err.position();
    assert_eq!((pos.line, pos.column), (1, 6));
}

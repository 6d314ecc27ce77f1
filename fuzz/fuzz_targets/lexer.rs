// fuzz_targets/lexer.rs
#![no_main]

use gofront::{Lexer, TokenKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Raw bytes: invalid UTF-8 must surface as an error, never a panic.
    let Ok(mut lx) = Lexer::new(data, "fuzz.go") else {
        return;
    };

    let mut raw = Vec::with_capacity(data.len());
    let mut last_end = 0u32;
    let max_steps = data.len().saturating_mul(2) + 8;

    for steps in 0.. {
        assert!(steps <= max_steps, "lexer does not make progress");
        let tok = match lx.next_token() {
            Ok(tok) => tok,
            Err(_) => return,
        };

        assert!(tok.span.start <= tok.span.end);
        assert!(tok.span.start >= last_end);
        assert!(tok.span.end as usize <= data.len());
        last_end = tok.span.end;
        raw.extend_from_slice(tok.raw_text.as_bytes());

        if tok.kind == TokenKind::EndOfFile {
            break;
        }
    }

    // Every consumed byte lands in exactly one token.
    assert_eq!(raw, data);
    assert_eq!(lx.next_token().map(|t| t.kind).ok(), Some(TokenKind::EndOfFile));
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::parser::scanner::{Scanner, TokenKind};

// Fuzz the tokenizer over arbitrary UTF-8 input.  Scanning may reject the
// input (unterminated strings, regexes, block comments), but it must never
// panic, and a successful scan must end in exactly one EOF token with every
// token range ordered.
fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(tokens) = Scanner::tokenize_all(source) else {
        return;
    };
    assert!(!tokens.is_empty());
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    for tok in &tokens {
        assert!(tok.range.begin <= tok.range.end);
    }
    assert_eq!(
        tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
        1
    );
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use rotor_core::parser::parse::parse;

// Fuzz the full parser over arbitrary UTF-8 input.  Rejections are fine;
// panics are not.  On a successful parse, every scope's parent chain must
// terminate at the program scope.
fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parsed) = parse(source) else {
        return;
    };
    for id in 0..parsed.scopes.len() {
        let mut cur = id;
        let mut hops = 0;
        while let Some(parent) = parsed.scopes.parent(cur) {
            cur = parent;
            hops += 1;
            assert!(hops <= parsed.scopes.len(), "scope parent cycle");
        }
        assert_eq!(cur, parsed.scopes.root());
    }
});

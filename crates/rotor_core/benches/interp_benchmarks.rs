//! Criterion benchmarks for the Rotor pipeline.
//!
//! Run with: `cargo bench --package rotor_core`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use rotor_core::parser::parse::parse;
use rotor_core::parser::scanner::Scanner;
use rotor_core::runtime::interp::Interp;

/// A small loop-heavy script touching every pipeline stage: declarations,
/// arithmetic, property stores, function calls, and a for-in walk.
const SCRIPT: &str = r#"
function fill(o, n) {
    var i;
    for (i = 0; i < n; i++) {
        o["k" + i] = i * 3 % 7;
    }
    return o;
}
var table = fill({}, 64);
var total = 0;
var v;
for (v in table) {
    total = total + v;
}
"#;

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_script", |b| {
        b.iter(|| {
            let tokens = Scanner::tokenize_all(black_box(SCRIPT)).unwrap();
            black_box(tokens.len());
        });
    });
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_script", |b| {
        b.iter(|| {
            let parsed = parse(black_box(SCRIPT)).unwrap();
            black_box(parsed.scopes.len());
        });
    });
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

fn bench_execute(c: &mut Criterion) {
    c.bench_function("execute_script", |b| {
        b.iter(|| {
            let parsed = parse(black_box(SCRIPT)).unwrap();
            let mut interp = Interp::new(parsed.scopes);
            interp.run(&parsed.root).unwrap();
            black_box(interp.scopes().len());
        });
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_execute);
criterion_main!(benches);

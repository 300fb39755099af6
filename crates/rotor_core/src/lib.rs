//! `rotor_core` — the foundational library for the Rotor script interpreter.
//!
//! Rotor interprets a dynamically typed, C-family scripting language by
//! walking its syntax tree directly.  The pipeline is linear and leaf-first:
//! source text is tokenized by [`parser::scanner`], shaped into an AST and a
//! scope tree by [`parser::parse`], and executed against the runtime value
//! model by [`runtime::interp`].
//!
//! # Crate layout
//!
//! - [`error`] — Engine error types and `RotorResult` alias.
//! - [`parser`] — Lexer, AST definitions, scope tree, and the parser itself.
//! - [`runtime`] — Runtime values and the tree-walking evaluator.

/// Engine error types and [`error::RotorResult`] alias.
pub mod error;
/// Script parser infrastructure (lexer, AST, scopes, parser).
pub mod parser;
/// Runtime value representation and the tree-walking evaluator.
pub mod runtime;

//! Runtime value representation and the tree-walking evaluator.
//!
//! - [`value`] — the shared, mutable, reference-counted [`value::Value`]
//!   handles and the in-band control-flow signals.
//! - [`interp`] — the evaluator that walks the AST.

/// The tree-walking evaluator.
pub mod interp;
/// Runtime value representation.
pub mod value;

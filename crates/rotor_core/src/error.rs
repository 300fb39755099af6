//! Error types for the Rotor engine.

use thiserror::Error;

/// All errors that can be produced by the Rotor engine.
///
/// Two kinds propagate to the host: [`Syntax`][RotorError::Syntax] errors
/// raised by the parser (and the scanner underneath it), and
/// [`Exec`][RotorError::Exec] errors raised by the evaluator.  Runtime
/// situations that the language itself tolerates — reading an unbound
/// identifier, arithmetic on mismatched types — do not error; they yield
/// `undefined` or `NaN` values instead.
#[derive(Debug, Error)]
pub enum RotorError {
    /// The source text could not be tokenized or parsed.  The message names
    /// the offending token and its position.
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// Evaluation reached a state the runtime cannot continue from: an
    /// unexpected control signal, property access through `undefined` or
    /// `null`, a call to a non-function, an invalid assignment target, or an
    /// unsupported operator form.
    #[error("ExecError: {0}")]
    Exec(String),
}

/// Convenient `Result` alias for fallible engine operations.
pub type RotorResult<T> = Result<T, RotorError>;

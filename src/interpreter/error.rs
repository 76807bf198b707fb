use thiserror::Error;

/// Fatal errors that end a run.
///
/// Undefined names are not errors here; they are reported as [`Diagnostic`]s
/// and evaluation continues.
///
/// [`Diagnostic`]: super::Diagnostic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Unsupported operand types for '{operator}': {left} and {right}")]
    UnsupportedOperands {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("Unsupported operand type for '{operator}': {operand}")]
    UnsupportedOperand {
        operator: String,
        operand: &'static str,
    },
    #[error("Malformed program tree: expected {expected}, found {found}")]
    MalformedTree {
        expected: &'static str,
        found: &'static str,
    },
}

/// A [`RuntimeError`] from a captured run, with whatever was written before it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct RunFailure {
    pub error: RuntimeError,
    pub output: Vec<String>,
    pub diagnostics: Vec<String>,
}

use thiserror::Error;

/// Non-fatal notices written to the diagnostic stream; evaluation carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("*** Error: variable {name} undefined!")]
    UndefinedVariable { name: String },
    #[error("*** Error: function {name} undefined!")]
    UndefinedFunction { name: String },
    #[error("*** Error: function {name} expects {expected} arguments, got {found}!")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

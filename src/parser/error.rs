use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, got {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Comparison operators cannot be chained at line {line}, column {column}")]
    ChainedComparison { line: usize, column: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;

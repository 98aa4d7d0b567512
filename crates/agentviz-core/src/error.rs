use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("Invalid reader signal at line {line}, column {column}")]
    Decode { line: usize, column: usize },
}

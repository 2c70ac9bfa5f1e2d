//! Error types for sf-sql

use thiserror::Error;

/// SQL tokenizing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL could not be tokenized (S001)
    #[error("[S001] SQL tokenize error at line {line}, column {column}: {message}")]
    Tokenize {
        message: String,
        line: u64,
        column: u64,
    },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;

//! Error types for sf-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Ledger already holds the version (D003)
    #[error("[D003] Version '{0}' is already recorded in the ledger")]
    DuplicateVersion(String),

    /// Ledger does not hold the version (D004)
    #[error("[D004] Version '{0}' is not recorded in the ledger")]
    NotApplied(String),

    /// Another runner holds the run lock (D005)
    #[error("[D005] Migration lock is held by {holder} since {acquired_at}; a run that crashed leaves it behind. If no other runner is active, release it with `DELETE FROM {table}` (dropping {table} is also safe)")]
    LockHeld {
        holder: String,
        acquired_at: String,
        table: String,
    },

    /// Transaction management error (D006)
    #[error("[D006] Transaction failed: {0}")]
    TransactionError(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

/// Whether a DuckDB error is a primary key / unique constraint violation.
///
/// duckdb::Error does not expose structured variants, so the message is
/// inspected.
pub(crate) fn is_unique_violation(err: &duckdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("Constraint Error") || msg.contains("Duplicate key")
}

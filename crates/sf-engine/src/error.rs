//! Error types for the apply engine.

use sf_core::{CoreError, Version};
use sf_db::DbError;
use sf_sql::SqlError;
use thiserror::Error;

/// Apply engine errors. Every variant is fatal for the run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Migration directory or file unreadable (M001).
    #[error("[M001] Failed to load migrations")]
    Load(#[from] CoreError),

    /// Ledger could not be created or read (M002).
    #[error("[M002] Ledger unavailable")]
    Ledger(#[source] DbError),

    /// Ledger checksum differs from the file on disk (M003).
    #[error(
        "[M003] Checksum mismatch for {version}\n  ledger:  {ledger_checksum}\n  current: {file_checksum}\nMigration file was modified after being applied"
    )]
    ChecksumMismatch {
        version: Version,
        ledger_checksum: String,
        file_checksum: String,
    },

    /// Migration file could not be split into statements (M004).
    #[error("[M004] Could not split {version} into statements")]
    StatementSplit {
        version: Version,
        #[source]
        source: SqlError,
    },

    /// A statement failed while executing a migration (M005).
    #[error("[M005] Statement failed in {version} ({})\nSQL: {statement}", rollback_note(.rolled_back))]
    StatementExecution {
        version: Version,
        statement: String,
        #[source]
        source: DbError,
        rolled_back: bool,
    },

    /// Ledger insert/delete failed after the statements ran (M006).
    #[error("[M006] Ledger update failed for {version} ({})", rollback_note(.rolled_back))]
    LedgerWrite {
        version: Version,
        #[source]
        source: DbError,
        rolled_back: bool,
    },

    /// BEGIN/COMMIT failed around a migration (M007).
    #[error("[M007] Transaction control failed for {version}")]
    Transaction {
        version: Version,
        #[source]
        source: DbError,
    },

    /// Another runner holds the lock, or the lock table is unusable (M008).
    #[error("[M008] Could not acquire migration lock")]
    Lock(#[source] DbError),

    /// Run was cancelled mid-migration (M009).
    #[error("[M009] Run cancelled during {version} ({})", rollback_note(.rolled_back))]
    Cancelled { version: Version, rolled_back: bool },
}

impl EngineError {
    /// The version the error occurred in, when there is one.
    pub fn version(&self) -> Option<&Version> {
        match self {
            EngineError::ChecksumMismatch { version, .. }
            | EngineError::StatementSplit { version, .. }
            | EngineError::StatementExecution { version, .. }
            | EngineError::LedgerWrite { version, .. }
            | EngineError::Transaction { version, .. }
            | EngineError::Cancelled { version, .. } => Some(version),
            EngineError::Load(_) | EngineError::Ledger(_) | EngineError::Lock(_) => None,
        }
    }

    /// Record whether the failed migration's transaction was rolled back.
    pub(crate) fn set_rolled_back(&mut self, value: bool) {
        match self {
            EngineError::StatementExecution { rolled_back, .. }
            | EngineError::LedgerWrite { rolled_back, .. }
            | EngineError::Cancelled { rolled_back, .. } => *rolled_back = value,
            _ => {}
        }
    }
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        "migration rolled back"
    } else {
        "no rollback performed; schema may be partially modified"
    }
}

/// Result type alias for [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;

//! Backend traits consumed by the apply engine.
//!
//! All calls are blocking; a backend owns one connection and is used from a
//! single thread for the duration of a run.

use crate::error::DbResult;
use sf_core::{Ledger, Version};
use std::sync::Arc;

/// Aborts the statement currently running on a connection, from any thread.
pub trait Interrupt: Send + Sync {
    fn interrupt(&self);
}

/// Statement execution and transaction control.
pub trait Database {
    /// Execute one or more SQL statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Open a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Whether DDL participates in transactions on this engine
    fn supports_transactional_ddl(&self) -> bool;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Handle that aborts the in-flight statement, if the engine supports it
    fn interrupt_handle(&self) -> Option<Arc<dyn Interrupt>> {
        None
    }
}

/// Persisted table of applied versions.
///
/// Rows are only ever inserted or deleted, never updated.
pub trait LedgerStore {
    /// Create the ledger table if it does not exist
    fn ensure_initialized(&self) -> DbResult<()>;

    /// Every ledger entry keyed by version; empty if the table does not exist
    fn all_entries(&self) -> DbResult<Ledger>;

    /// Insert an entry; fails with `DuplicateVersion` if the version exists
    fn record_applied(&self, version: &Version, checksum: &str) -> DbResult<()>;

    /// Delete an entry; fails with `NotApplied` if the version is absent
    fn remove_applied(&self, version: &Version) -> DbResult<()>;
}

/// Mutual exclusion between runners sharing a database.
pub trait RunLock {
    /// Take the lock for `holder`; fails with `LockHeld` if already taken
    fn acquire_lock(&self, holder: &str) -> DbResult<()>;

    /// Release the lock if `holder` owns it
    fn release_lock(&self, holder: &str) -> DbResult<()>;
}

/// Everything the apply engine needs from a backend.
pub trait MigrationBackend: Database + LedgerStore + RunLock {}

impl<T: Database + LedgerStore + RunLock> MigrationBackend for T {}

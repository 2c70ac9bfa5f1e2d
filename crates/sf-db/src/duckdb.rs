//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Interrupt};
use duckdb::{AccessMode, Connection, InterruptHandle};
use sf_core::config::MEMORY_DB_PATH;
use sf_core::sql_utils::quote_ident;
use std::path::Path;
use std::sync::Arc;

/// Default ledger table name.
pub const DEFAULT_LEDGER_TABLE: &str = "schema_migrations";

/// DuckDB backend owning a single connection for the whole run.
///
/// Single-threaded; no `Mutex` needed because migrations run sequentially.
/// The connection is closed when the backend is dropped.
pub struct DuckDbBackend {
    conn: Connection,
    ledger_table: String,
}

impl DuckDbBackend {
    /// Open a DuckDB database (path or `:memory:`) and verify it responds.
    pub fn open(path: &str, ledger_table: &str) -> DbResult<Self> {
        let conn = if path == MEMORY_DB_PATH {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(path))
        }
        .map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))?;

        conn.execute_batch("SELECT 1")
            .map_err(|e| DbError::ConnectionError(format!("ping failed: {e}: {path}")))?;

        log::debug!("Connected to duckdb at {path}");
        Ok(Self {
            conn,
            ledger_table: ledger_table.to_string(),
        })
    }

    /// Open an existing database file without write access.
    ///
    /// Used by read-only commands; fails if the file does not exist.
    pub fn open_read_only(path: &str, ledger_table: &str) -> DbResult<Self> {
        let config = duckdb::Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))?;
        let conn = Connection::open_with_flags(Path::new(path), config)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))?;

        log::debug!("Connected to duckdb at {path} (read-only)");
        Ok(Self {
            conn,
            ledger_table: ledger_table.to_string(),
        })
    }

    /// Create an in-memory database with the default ledger table name.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn in_memory() -> DbResult<Self> {
        Self::open(MEMORY_DB_PATH, DEFAULT_LEDGER_TABLE)
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Unquoted ledger table name
    pub fn ledger_table(&self) -> &str {
        &self.ledger_table
    }

    /// Unquoted lock table name (`<ledger>_lock`)
    pub fn lock_table(&self) -> String {
        format!("{}_lock", self.ledger_table)
    }

    pub(crate) fn quoted_ledger_table(&self) -> String {
        quote_ident(&self.ledger_table)
    }

    pub(crate) fn quoted_lock_table(&self) -> String {
        quote_ident(&self.lock_table())
    }

    /// Check whether a table exists in the current schema.
    pub fn table_exists(&self, name: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = ?",
            duckdb::params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl Database for DuckDbBackend {
    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn supports_transactional_ddl(&self) -> bool {
        true
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    fn interrupt_handle(&self) -> Option<Arc<dyn Interrupt>> {
        let handle: Arc<dyn Interrupt> = self.conn.interrupt_handle();
        Some(handle)
    }
}

/// An interrupted statement fails with an `INTERRUPT` error; a handle whose
/// connection was dropped does nothing.
impl Interrupt for InterruptHandle {
    fn interrupt(&self) {
        InterruptHandle::interrupt(self)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

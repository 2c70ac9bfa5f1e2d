//! Run lock: a single-row table that only one runner can hold at a time.
//!
//! DuckDB has no advisory locks, so the lock is a row with a fixed primary
//! key in `<ledger>_lock`. [`RunLockGuard`] scopes it to a run and releases
//! it on drop, including when the run fails.

use crate::duckdb::DuckDbBackend;
use crate::error::{is_unique_violation, DbError, DbResult};
use crate::traits::RunLock;
use duckdb::params;

/// Primary key of the single lock row.
const LOCK_ROW_ID: i32 = 1;

impl DuckDbBackend {
    fn ensure_lock_table(&self) -> DbResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id          INTEGER   PRIMARY KEY,
                 holder      VARCHAR   NOT NULL,
                 acquired_at TIMESTAMP NOT NULL DEFAULT current_timestamp
             )",
            self.quoted_lock_table()
        );
        self.conn().execute_batch(&sql).map_err(|e| {
            DbError::ExecutionError(format!(
                "failed to create lock table {}: {e}",
                self.lock_table()
            ))
        })
    }

    fn current_lock_holder(&self) -> DbResult<(String, String)> {
        let sql = format!(
            "SELECT holder, CAST(acquired_at AS VARCHAR) FROM {} WHERE id = ?",
            self.quoted_lock_table()
        );
        let holder = self
            .conn()
            .query_row(&sql, params![LOCK_ROW_ID], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
        Ok(holder)
    }
}

impl RunLock for DuckDbBackend {
    fn acquire_lock(&self, holder: &str) -> DbResult<()> {
        self.ensure_lock_table()?;
        let sql = format!(
            "INSERT INTO {} (id, holder) VALUES (?, ?)",
            self.quoted_lock_table()
        );
        match self.conn().execute(&sql, params![LOCK_ROW_ID, holder]) {
            Ok(_) => {
                log::debug!("Acquired migration lock as {holder}");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                let (current, acquired_at) = self.current_lock_holder()?;
                Err(DbError::LockHeld {
                    holder: current,
                    acquired_at,
                    table: self.lock_table(),
                })
            }
            Err(e) => Err(DbError::ExecutionError(format!(
                "failed to acquire migration lock: {e}"
            ))),
        }
    }

    fn release_lock(&self, holder: &str) -> DbResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ? AND holder = ?",
            self.quoted_lock_table()
        );
        let deleted = self.conn().execute(&sql, params![LOCK_ROW_ID, holder])?;
        if deleted == 0 {
            log::warn!("Migration lock was not held by {holder} at release");
        } else {
            log::debug!("Released migration lock held by {holder}");
        }
        Ok(())
    }
}

/// Holds the run lock for its lifetime.
pub struct RunLockGuard<'a, L: RunLock + ?Sized> {
    lock: &'a L,
    holder: String,
    released: bool,
}

impl<'a, L: RunLock + ?Sized> RunLockGuard<'a, L> {
    /// Acquire the lock under a fresh holder id.
    pub fn acquire(lock: &'a L) -> DbResult<Self> {
        let holder = uuid::Uuid::new_v4().to_string();
        lock.acquire_lock(&holder)?;
        Ok(Self {
            lock,
            holder,
            released: false,
        })
    }

    /// Holder id recorded in the lock row
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Release the lock now, surfacing any error.
    pub fn release(mut self) -> DbResult<()> {
        self.released = true;
        self.lock.release_lock(&self.holder)
    }
}

impl<L: RunLock + ?Sized> Drop for RunLockGuard<'_, L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.lock.release_lock(&self.holder) {
            log::warn!("Failed to release migration lock: {e}");
        }
    }
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;

//! Ledger store: the persisted table of applied versions.

use crate::duckdb::DuckDbBackend;
use crate::error::{is_unique_violation, DbError, DbResult};
use crate::traits::LedgerStore;
use chrono::NaiveDateTime;
use duckdb::params;
use sf_core::{Ledger, LedgerEntry, Version};

const APPLIED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl LedgerStore for DuckDbBackend {
    fn ensure_initialized(&self) -> DbResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version    VARCHAR   PRIMARY KEY,
                 checksum   VARCHAR   NOT NULL,
                 applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp
             )",
            self.quoted_ledger_table()
        );
        self.conn().execute_batch(&sql).map_err(|e| {
            DbError::ExecutionError(format!(
                "failed to create ledger table {}: {e}",
                self.ledger_table()
            ))
        })
    }

    fn all_entries(&self) -> DbResult<Ledger> {
        if !self.table_exists(self.ledger_table())? {
            log::debug!("Ledger table {} does not exist yet", self.ledger_table());
            return Ok(Ledger::new());
        }

        let sql = format!(
            "SELECT version, checksum, strftime(applied_at, '{APPLIED_AT_FORMAT}') \
             FROM {} ORDER BY version",
            self.quoted_ledger_table()
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut ledger = Ledger::new();
        for row in rows {
            let (version, checksum, applied_at) = row?;
            let version = Version::try_new(version)
                .ok_or_else(|| DbError::Internal("empty version in ledger".to_string()))?;
            let applied_at = NaiveDateTime::parse_from_str(&applied_at, APPLIED_AT_FORMAT)
                .map_err(|e| {
                    DbError::Internal(format!(
                        "unparseable applied_at '{applied_at}' for {version}: {e}"
                    ))
                })?;
            ledger.insert(
                version.clone(),
                LedgerEntry {
                    version,
                    checksum,
                    applied_at,
                },
            );
        }
        Ok(ledger)
    }

    fn record_applied(&self, version: &Version, checksum: &str) -> DbResult<()> {
        let table = self.quoted_ledger_table();
        let existing: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE version = ?"),
            params![version.as_str()],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(DbError::DuplicateVersion(version.to_string()));
        }

        self.conn()
            .execute(
                &format!("INSERT INTO {table} (version, checksum) VALUES (?, ?)"),
                params![version.as_str(), checksum],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateVersion(version.to_string())
                } else {
                    DbError::ExecutionError(format!("failed to record {version}: {e}"))
                }
            })?;
        Ok(())
    }

    fn remove_applied(&self, version: &Version) -> DbResult<()> {
        let deleted = self
            .conn()
            .execute(
                &format!(
                    "DELETE FROM {} WHERE version = ?",
                    self.quoted_ledger_table()
                ),
                params![version.as_str()],
            )
            .map_err(|e| DbError::ExecutionError(format!("failed to remove {version}: {e}")))?;
        if deleted == 0 {
            return Err(DbError::NotApplied(version.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;

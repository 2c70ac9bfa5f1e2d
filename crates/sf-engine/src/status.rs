//! Status report: per-version state across forward files and the ledger.

use chrono::NaiveDateTime;
use serde::Serialize;
use sf_core::{classify, Ledger, MigrationFile, MigrationState, Version};
use std::collections::{BTreeMap, BTreeSet};

/// One line of the status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub version: Version,
    pub state: MigrationState,

    /// Checksum of the forward file on disk, if there is one
    pub file_checksum: Option<String>,

    /// Checksum recorded in the ledger, if applied
    pub ledger_checksum: Option<String>,

    pub applied_at: Option<NaiveDateTime>,
}

/// Totals shown under the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    /// Applied with a matching checksum
    pub applied: usize,
    pub pending: usize,
    pub mismatched: usize,
    pub orphaned: usize,
}

/// Rows for the union of forward-file versions and ledger versions, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub rows: Vec<StatusRow>,
    pub counts: StatusCounts,
}

impl StatusReport {
    pub fn build(forward: &[MigrationFile], ledger: &Ledger) -> Self {
        let files: BTreeMap<&Version, &MigrationFile> =
            forward.iter().map(|f| (&f.version, f)).collect();
        let versions: BTreeSet<&Version> = files.keys().copied().chain(ledger.keys()).collect();

        let mut counts = StatusCounts::default();
        let rows: Vec<StatusRow> = versions
            .into_iter()
            .map(|version| {
                let file_checksum = files.get(version).map(|f| f.checksum.clone());
                let entry = ledger.get(version);
                let state = classify(
                    file_checksum.as_deref(),
                    entry.map(|e| e.checksum.as_str()),
                );
                match state {
                    MigrationState::Pending => counts.pending += 1,
                    MigrationState::AppliedOk => counts.applied += 1,
                    MigrationState::AppliedMismatch => counts.mismatched += 1,
                    MigrationState::Orphaned => counts.orphaned += 1,
                }
                StatusRow {
                    version: version.clone(),
                    state,
                    file_checksum,
                    ledger_checksum: entry.map(|e| e.checksum.clone()),
                    applied_at: entry.map(|e| e.applied_at),
                }
            })
            .collect();
        counts.total = rows.len();

        Self { rows, counts }
    }

    /// Rows whose ledger checksum differs from the file on disk
    pub fn mismatches(&self) -> impl Iterator<Item = &StatusRow> {
        self.rows_in(MigrationState::AppliedMismatch)
    }

    /// Ledger entries with no forward file
    pub fn orphans(&self) -> impl Iterator<Item = &StatusRow> {
        self.rows_in(MigrationState::Orphaned)
    }

    fn rows_in(&self, state: MigrationState) -> impl Iterator<Item = &StatusRow> {
        self.rows.iter().filter(move |row| row.state == state)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;

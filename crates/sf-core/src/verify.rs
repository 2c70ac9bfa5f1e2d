//! Integrity verifier: cross-references migration files against the ledger.
//!
//! The same classification drives both the apply engine (where a mismatch
//! is a hard stop) and the status report (where it is a warning).

use crate::migration::{Ledger, LedgerEntry, MigrationFile};
use crate::version::Version;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Classification of a single version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationState {
    /// Forward file exists, no ledger entry
    Pending,
    /// Ledger checksum equals the file checksum
    AppliedOk,
    /// Ledger checksum differs from the file checksum
    AppliedMismatch,
    /// Ledger entry without a forward file to compare against
    Orphaned,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::AppliedOk => write!(f, "applied-ok"),
            MigrationState::AppliedMismatch => write!(f, "applied-mismatch"),
            MigrationState::Orphaned => write!(f, "orphaned"),
        }
    }
}

/// Classify a version from its file checksum and ledger checksum.
///
/// `None` for both is not a real version; it is reported as pending.
pub fn classify(file_checksum: Option<&str>, ledger_checksum: Option<&str>) -> MigrationState {
    match (file_checksum, ledger_checksum) {
        (_, None) => MigrationState::Pending,
        (None, Some(_)) => MigrationState::Orphaned,
        (Some(file), Some(ledger)) if file == ledger => MigrationState::AppliedOk,
        (Some(_), Some(_)) => MigrationState::AppliedMismatch,
    }
}

/// Drift between a ledger-recorded checksum and the current forward file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumMismatch {
    pub version: Version,
    pub ledger_checksum: String,
    pub file_checksum: String,
}

/// Return the first forward file (in version order) whose ledger checksum
/// differs from its current checksum.
pub fn first_mismatch(forward: &[MigrationFile], ledger: &Ledger) -> Option<ChecksumMismatch> {
    forward.iter().find_map(|file| {
        let entry = ledger.get(&file.version)?;
        match classify(Some(&file.checksum), Some(&entry.checksum)) {
            MigrationState::AppliedMismatch => Some(ChecksumMismatch {
                version: file.version.clone(),
                ledger_checksum: entry.checksum.clone(),
                file_checksum: file.checksum.clone(),
            }),
            _ => None,
        }
    })
}

/// Ledger entries whose version has no forward file on disk, in version order.
pub fn find_orphans<'a>(forward: &[MigrationFile], ledger: &'a Ledger) -> Vec<&'a LedgerEntry> {
    let on_disk: BTreeSet<&Version> = forward.iter().map(|f| &f.version).collect();
    ledger
        .values()
        .filter(|entry| !on_disk.contains(&entry.version))
        .collect()
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;

//! Migration file and ledger entry types.

use crate::version::Version;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which way a migration file moves the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward ("up") migration
    Up,
    /// Reverse ("down") migration
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A migration file loaded from disk.
///
/// Recomputed from the filesystem on every invocation and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Filename with the direction suffix stripped
    pub version: Version,

    /// Direction implied by the filename suffix
    pub direction: Direction,

    /// SHA-256 of the exact file bytes (lowercase hex)
    pub checksum: String,

    /// Raw SQL text
    pub content: String,

    /// Path the file was loaded from
    pub path: PathBuf,
}

/// One row of the persisted ledger: a forward migration that has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub version: Version,

    /// Checksum recorded when the migration was applied
    pub checksum: String,

    /// Set by the store at insertion time
    pub applied_at: NaiveDateTime,
}

/// The full ledger keyed by version.
pub type Ledger = BTreeMap<Version, LedgerEntry>;

//! sf-core - Core library for Schemaflow
//!
//! This crate provides the shared migration types, the migration file loader,
//! content checksums, the integrity verifier that compares files against the
//! ledger, and configuration parsing used across all Schemaflow components.

pub mod checksum;
pub mod config;
pub mod error;
pub mod loader;
pub mod migration;
pub mod sql_utils;
pub mod verify;
pub mod version;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, TransactionMode};
pub use error::{CoreError, CoreResult};
pub use loader::load_migrations;
pub use migration::{Direction, Ledger, LedgerEntry, MigrationFile};
pub use verify::{classify, find_orphans, first_mismatch, ChecksumMismatch, MigrationState};
pub use version::Version;

//! sf-db - Database layer for Schemaflow
//!
//! This crate provides the backend traits used by the apply engine and their
//! DuckDB implementation: statement execution, per-migration transactions,
//! the persisted ledger of applied versions, and the run lock.

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod lock;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use lock::RunLockGuard;
pub use traits::{Database, Interrupt, LedgerStore, MigrationBackend, RunLock};

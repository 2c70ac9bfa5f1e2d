//! sf-engine - Apply engine for Schemaflow
//!
//! Consumes the loader's ordered migration list, verifies it against the
//! ledger, and applies (`up`) or reverses (`down`) migrations one file at a
//! time. Also builds the read-only status report.

pub mod cancel;
pub mod error;
pub mod migrator;
pub mod status;

pub use cancel::CancelFlag;
pub use error::{EngineError, EngineResult};
pub use migrator::{Migrator, MigratorSettings, RunSummary};
pub use status::{StatusCounts, StatusReport, StatusRow};

//! sf-sql - SQL layer for Schemaflow
//!
//! This crate splits migration files into individual statements using the
//! sqlparser-rs tokenizer, so separators inside string literals, quoted
//! identifiers and comments are never treated as statement boundaries.

pub mod dialect;
pub mod error;
pub mod splitter;

pub use dialect::{DuckDbDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use splitter::{split_statements, StatementSplitter};

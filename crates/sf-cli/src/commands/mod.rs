//! CLI command implementations

pub(crate) mod common;
pub(crate) mod format_helpers;
pub(crate) mod migrate;
pub(crate) mod status;

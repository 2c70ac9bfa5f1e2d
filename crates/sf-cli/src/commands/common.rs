//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sf_core::config::MEMORY_DB_PATH;
use sf_core::Config;
use sf_db::DuckDbBackend;
use sf_engine::{CancelFlag, MigratorSettings};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Resolved configuration plus the directory relative paths resolve against.
#[derive(Debug, Clone)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    pub(crate) fn settings(&self) -> MigratorSettings {
        MigratorSettings::from_config(&self.config, &self.root)
    }

    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    pub(crate) fn database_path(&self) -> String {
        self.config.database_path_absolute(&self.root)
    }

    /// Open the target database for a migration run.
    pub(crate) fn open_backend(&self) -> Result<DuckDbBackend> {
        let path = self.database_path();
        DuckDbBackend::open(&path, &self.config.ledger_table)
            .with_context(|| format!("Failed to open database {path}"))
    }

    /// Open the target database without creating or writing it.
    ///
    /// An in-memory target or a database file that does not exist yet has an
    /// empty ledger, so a fresh in-memory database stands in for it. DuckDB
    /// cannot open `:memory:` read-only.
    pub(crate) fn open_backend_read_only(&self) -> Result<DuckDbBackend> {
        let path = self.database_path();
        if path == MEMORY_DB_PATH || !Path::new(&path).exists() {
            log::debug!("Database {path} has no ledger yet; nothing is applied");
            return DuckDbBackend::open(MEMORY_DB_PATH, &self.config.ledger_table)
                .context("Failed to open in-memory database");
        }
        DuckDbBackend::open_read_only(&path, &self.config.ledger_table)
            .with_context(|| format!("Failed to open database {path}"))
    }
}

/// Load the config (file or defaults) and apply CLI/environment overrides.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = global.project_dir.clone();
    let mut config = match &global.config {
        Some(path) => Config::load(path),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load config")?;

    if let Some(dir) = &global.migrations_dir {
        config.migrations_dir = dir.display().to_string();
    }
    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    config.validate().context("Invalid configuration")?;

    Ok(Project { root, config })
}

/// Run blocking migration work off the async runtime, cancelling it on Ctrl-C.
///
/// The work receives a [`CancelFlag`] that is set when the interrupt arrives.
/// Cancelling interrupts the statement in flight on any connection attached to
/// the flag, and the result is still awaited so the lock and any open
/// transaction are cleaned up. A second interrupt exits immediately.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce(CancelFlag) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let cancel = CancelFlag::new();
    let mut handle = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || work(cancel)
    });

    tokio::select! {
        joined = &mut handle => return joined.context("Migration task panicked")?,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupt received; cancelling the running migration (press Ctrl-C again to exit now)");
            cancel.cancel();
        }
    }

    tokio::select! {
        joined = &mut handle => joined.context("Migration task panicked")?,
        _ = tokio::signal::ctrl_c() => {
            log::error!("Second interrupt received; exiting without cleanup");
            std::process::exit(130);
        }
    }
}

/// Calculate column widths for a table.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Render a left-aligned table: header row, dash separator, data rows.
///
/// Columns are separated by two spaces; trailing padding is trimmed.
///
/// ```ignore
/// format_table(&["VERSION", "STATUS"], &[vec!["0001_users".into(), "pending".into()]]);
/// // VERSION     STATUS
/// // ----------  -------
/// // 0001_users  pending
/// ```
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);
    let mut out = String::new();

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_row(&mut out, &separator, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
        .collect();
    out.push_str(parts.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;

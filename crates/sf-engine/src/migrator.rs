//! Apply engine: runs forward or reverse migrations in version order.
//!
//! Per run, each version is visited once:
//! - `up` walks forward files ascending. Applied versions are skipped, new
//!   ones are executed and recorded in the ledger.
//! - `down` walks reverse files descending. Versions absent from the ledger
//!   are skipped, applied ones are executed and removed from the ledger.
//!
//! Before anything executes, `up` verifies every applied checksum and every
//! file to be run is split into statements, so drift and unsplittable files
//! abort the run with the database untouched.
//!
//! Cancellation is checked before each statement and interrupts the one in
//! flight; an interrupted migration is rolled back like a failed one.

use crate::cancel::CancelFlag;
use crate::error::{EngineError, EngineResult};
use crate::status::StatusReport;
use serde::Serialize;
use sf_core::{
    find_orphans, first_mismatch, load_migrations, Config, Direction, Ledger, MigrationFile,
    TransactionMode, Version,
};
use sf_db::{DbResult, MigrationBackend, RunLockGuard};
use sf_sql::StatementSplitter;
use std::path::{Path, PathBuf};

/// Inputs the engine needs from configuration.
#[derive(Debug, Clone)]
pub struct MigratorSettings {
    pub migrations_dir: PathBuf,
    pub forward_suffix: String,
    pub reverse_suffix: String,
    pub transaction_mode: TransactionMode,
}

impl MigratorSettings {
    /// Build settings from a config, resolving paths against `root`.
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            migrations_dir: config.migrations_dir_absolute(root),
            forward_suffix: config.forward_suffix.clone(),
            reverse_suffix: config.reverse_suffix.clone(),
            transaction_mode: config.transaction_mode,
        }
    }

    fn suffix_for(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.forward_suffix,
            Direction::Down => &self.reverse_suffix,
        }
    }
}

/// Outcome of an `up` or `down` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub direction: Direction,

    /// Migration files found for this direction
    pub found: usize,

    /// Versions applied (up) or rolled back (down), in execution order
    pub applied: Vec<Version>,

    /// Versions skipped as already applied (up) or not applied (down)
    pub skipped: Vec<Version>,

    /// Nothing was executed; `applied` lists what would have run
    pub dry_run: bool,
}

impl RunSummary {
    fn new(direction: Direction, found: usize, dry_run: bool) -> Self {
        Self {
            direction,
            found,
            applied: Vec::new(),
            skipped: Vec::new(),
            dry_run,
        }
    }
}

/// A migration file with its statements split out, ready to execute.
struct PlannedMigration<'f> {
    file: &'f MigrationFile,
    statements: Vec<String>,
}

/// Runs migrations against a backend.
///
/// The backend (and its connection) is owned by the caller and passed in for
/// the whole run; the engine holds no global state.
pub struct Migrator<'a, B: MigrationBackend> {
    backend: &'a B,
    settings: MigratorSettings,
    splitter: StatementSplitter,
    cancel: CancelFlag,
}

impl<'a, B: MigrationBackend> Migrator<'a, B> {
    pub fn new(backend: &'a B, settings: MigratorSettings) -> Self {
        Self {
            backend,
            settings,
            splitter: StatementSplitter::duckdb(),
            cancel: CancelFlag::new(),
        }
    }

    /// Use `cancel` to abort the run from another thread.
    ///
    /// The backend's interrupt handle is attached, so cancelling also aborts
    /// a statement that is already executing.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        if let Some(handle) = self.backend.interrupt_handle() {
            cancel.attach(handle);
        }
        self.cancel = cancel;
        self
    }

    /// Apply every pending forward migration.
    pub fn up(&self) -> EngineResult<RunSummary> {
        self.run(Direction::Up, false)
    }

    /// Roll back every applied version that has a reverse file.
    pub fn down(&self) -> EngineResult<RunSummary> {
        self.run(Direction::Down, false)
    }

    /// Run `direction`, or only plan it when `dry_run` is set.
    ///
    /// A dry run loads, verifies and splits exactly like a real run but takes
    /// no lock and never writes to the database.
    pub fn run(&self, direction: Direction, dry_run: bool) -> EngineResult<RunSummary> {
        let files = self.load(direction)?;
        if files.is_empty() {
            log::info!(
                "No {} migrations found in {}",
                direction,
                self.settings.migrations_dir.display()
            );
            return Ok(RunSummary::new(direction, 0, dry_run));
        }

        let _lock = if dry_run {
            None
        } else {
            let guard = RunLockGuard::acquire(self.backend).map_err(EngineError::Lock)?;
            self.backend
                .ensure_initialized()
                .map_err(EngineError::Ledger)?;
            Some(guard)
        };
        let ledger = self.backend.all_entries().map_err(EngineError::Ledger)?;

        match direction {
            Direction::Up => self.run_up(&files, &ledger, dry_run),
            Direction::Down => self.run_down(&files, &ledger, dry_run),
        }
    }

    /// Build the read-only status report. Takes no lock and writes nothing.
    pub fn status(&self) -> EngineResult<StatusReport> {
        let forward = self.load(Direction::Up)?;
        let ledger = self.backend.all_entries().map_err(EngineError::Ledger)?;
        Ok(StatusReport::build(&forward, &ledger))
    }

    fn load(&self, direction: Direction) -> EngineResult<Vec<MigrationFile>> {
        Ok(load_migrations(
            &self.settings.migrations_dir,
            direction,
            self.settings.suffix_for(direction),
        )?)
    }

    fn run_up(
        &self,
        files: &[MigrationFile],
        ledger: &Ledger,
        dry_run: bool,
    ) -> EngineResult<RunSummary> {
        if let Some(mismatch) = first_mismatch(files, ledger) {
            return Err(EngineError::ChecksumMismatch {
                version: mismatch.version,
                ledger_checksum: mismatch.ledger_checksum,
                file_checksum: mismatch.file_checksum,
            });
        }
        for orphan in find_orphans(files, ledger) {
            log::warn!(
                "Ledger entry {} has no forward file on disk (orphaned)",
                orphan.version
            );
        }

        let mut summary = RunSummary::new(Direction::Up, files.len(), dry_run);
        let mut pending = Vec::new();
        for file in files {
            if ledger.contains_key(&file.version) {
                log::info!("Skipping {} (already applied)", file.version);
                summary.skipped.push(file.version.clone());
            } else {
                pending.push(self.plan(file)?);
            }
        }

        let mode = self.effective_mode();
        for planned in pending {
            let version = &planned.file.version;
            if dry_run {
                log::info!(
                    "Would apply {} ({} statements)",
                    version,
                    planned.statements.len()
                );
            } else {
                log::info!("Applying {}...", version);
                self.execute(&planned, mode, |backend| {
                    backend.record_applied(version, &planned.file.checksum)
                })?;
                log::info!("Applied {}", version);
            }
            summary.applied.push(version.clone());
        }
        Ok(summary)
    }

    fn run_down(
        &self,
        files: &[MigrationFile],
        ledger: &Ledger,
        dry_run: bool,
    ) -> EngineResult<RunSummary> {
        let mut summary = RunSummary::new(Direction::Down, files.len(), dry_run);
        let mut pending = Vec::new();
        for file in files.iter().rev() {
            if ledger.contains_key(&file.version) {
                pending.push(self.plan(file)?);
            } else {
                log::info!("Skipping {} (not applied)", file.version);
                summary.skipped.push(file.version.clone());
            }
        }

        let mode = self.effective_mode();
        for planned in pending {
            let version = &planned.file.version;
            if dry_run {
                log::info!(
                    "Would roll back {} ({} statements)",
                    version,
                    planned.statements.len()
                );
            } else {
                log::info!("Rolling back {}...", version);
                self.execute(&planned, mode, |backend| backend.remove_applied(version))?;
                log::info!("Rolled back {}", version);
            }
            summary.applied.push(version.clone());
        }
        Ok(summary)
    }

    fn plan<'f>(&self, file: &'f MigrationFile) -> EngineResult<PlannedMigration<'f>> {
        let statements =
            self.splitter
                .split(&file.content)
                .map_err(|source| EngineError::StatementSplit {
                    version: file.version.clone(),
                    source,
                })?;
        Ok(PlannedMigration { file, statements })
    }

    fn effective_mode(&self) -> TransactionMode {
        match self.settings.transaction_mode {
            TransactionMode::PerMigration if !self.backend.supports_transactional_ddl() => {
                log::warn!(
                    "{} does not support transactional DDL; running migrations without transactions",
                    self.backend.db_type()
                );
                TransactionMode::None
            }
            mode => mode,
        }
    }

    /// Execute one migration's statements followed by its ledger write.
    ///
    /// Under `PerMigration` everything runs in one transaction that is rolled
    /// back on any failure. Under `None` statements auto-commit and nothing
    /// is undone.
    fn execute<F>(
        &self,
        planned: &PlannedMigration<'_>,
        mode: TransactionMode,
        ledger_write: F,
    ) -> EngineResult<()>
    where
        F: FnOnce(&B) -> DbResult<()>,
    {
        let version = &planned.file.version;
        let transactional = mode == TransactionMode::PerMigration;

        if transactional {
            self.backend
                .begin()
                .map_err(|source| EngineError::Transaction {
                    version: version.clone(),
                    source,
                })?;
        }

        let result = self.execute_body(planned, ledger_write, transactional);

        if !transactional {
            return result;
        }
        match result {
            Ok(()) => self
                .backend
                .commit()
                .map_err(|source| EngineError::Transaction {
                    version: version.clone(),
                    source,
                }),
            Err(mut err) => {
                if let Err(rollback_err) = self.backend.rollback() {
                    log::warn!("Rollback of {version} failed: {rollback_err}");
                    err.set_rolled_back(false);
                }
                Err(err)
            }
        }
    }

    fn execute_body<F>(
        &self,
        planned: &PlannedMigration<'_>,
        ledger_write: F,
        transactional: bool,
    ) -> EngineResult<()>
    where
        F: FnOnce(&B) -> DbResult<()>,
    {
        let version = &planned.file.version;
        for statement in &planned.statements {
            self.check_cancelled(version, transactional)?;
            log::debug!("{version}: {statement}");
            self.backend.execute_batch(statement).map_err(|source| {
                if self.cancel.is_cancelled() {
                    log::debug!("{version}: statement interrupted: {source}");
                    return self.cancelled(version, transactional);
                }
                EngineError::StatementExecution {
                    version: version.clone(),
                    statement: statement.clone(),
                    source,
                    rolled_back: transactional,
                }
            })?;
        }

        self.check_cancelled(version, transactional)?;
        ledger_write(self.backend).map_err(|source| {
            if self.cancel.is_cancelled() {
                return self.cancelled(version, transactional);
            }
            EngineError::LedgerWrite {
                version: version.clone(),
                source,
                rolled_back: transactional,
            }
        })
    }

    fn check_cancelled(&self, version: &Version, transactional: bool) -> EngineResult<()> {
        if self.cancel.is_cancelled() {
            return Err(self.cancelled(version, transactional));
        }
        Ok(())
    }

    fn cancelled(&self, version: &Version, transactional: bool) -> EngineError {
        EngineError::Cancelled {
            version: version.clone(),
            rolled_back: transactional,
        }
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;

//! Human-readable rendering of run summaries and status reports.
//!
//! Everything here returns a `String` so commands decide where it goes
//! (stdout) and tests can assert on it.

use sf_core::checksum::short_checksum;
use sf_core::{Direction, MigrationState};
use sf_engine::{RunSummary, StatusReport, StatusRow};
use std::fmt::Write;
use std::path::Path;

use crate::commands::common::format_table;

const STATUS_HEADERS: &[&str] = &["VERSION", "STATUS", "APPLIED_AT", "CHECKSUM"];

/// Summary printed after `up` or `down`.
pub(crate) fn format_run_summary(summary: &RunSummary, migrations_dir: &Path) -> String {
    if summary.found == 0 {
        return format!("No migrations found in {}\n", migrations_dir.display());
    }

    let mut out = String::new();
    let (verb, skipped_as, nothing) = match summary.direction {
        Direction::Up => ("Applied", "already applied", "Nothing to apply; database is up to date"),
        Direction::Down => ("Rolled back", "not applied", "Nothing to roll back"),
    };
    let verb = match (summary.dry_run, summary.direction) {
        (false, _) => verb,
        (true, Direction::Up) => "Would apply",
        (true, Direction::Down) => "Would roll back",
    };

    if summary.applied.is_empty() {
        let _ = writeln!(out, "{nothing}");
    } else {
        for version in &summary.applied {
            let _ = writeln!(out, "  {verb}: {version}");
        }
        let _ = writeln!(
            out,
            "{verb} {} migration{}",
            summary.applied.len(),
            plural(summary.applied.len())
        );
    }
    if !summary.skipped.is_empty() {
        let _ = writeln!(out, "Skipped {} ({skipped_as})", summary.skipped.len());
    }
    out
}

/// Status table followed by totals, warnings and hints.
pub(crate) fn format_status(report: &StatusReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No migrations found.\n");
    } else {
        let rows: Vec<Vec<String>> = report.rows.iter().map(status_cells).collect();
        out.push_str(&format_table(STATUS_HEADERS, &rows));
    }

    let c = &report.counts;
    let _ = writeln!(
        out,
        "\nTotal: {} | Applied: {} | Pending: {} | Mismatches: {} | Orphaned: {}",
        c.total, c.applied, c.pending, c.mismatched, c.orphaned
    );

    for row in report.mismatches() {
        let _ = writeln!(
            out,
            "\nWARNING: {} was modified after being applied\n  ledger:  {}\n  current: {}",
            row.version,
            row.ledger_checksum.as_deref().unwrap_or("-"),
            row.file_checksum.as_deref().unwrap_or("-"),
        );
    }
    if c.orphaned > 0 {
        let _ = writeln!(
            out,
            "\nNOTE: {} applied migration{} no longer on disk (orphaned)",
            c.orphaned,
            if c.orphaned == 1 { " is" } else { "s are" }
        );
    }
    if c.pending > 0 {
        let _ = writeln!(
            out,
            "\nRun `migrate up` to apply {} pending migration{}",
            c.pending,
            plural(c.pending)
        );
    }
    out
}

fn status_cells(row: &StatusRow) -> Vec<String> {
    let applied_at = row
        .applied_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    vec![
        row.version.to_string(),
        row.state.to_string(),
        applied_at,
        checksum_cell(row),
    ]
}

fn checksum_cell(row: &StatusRow) -> String {
    let short = |c: &Option<String>| {
        c.as_deref()
            .map(short_checksum)
            .unwrap_or("-")
            .to_string()
    };
    match row.state {
        MigrationState::AppliedMismatch => format!(
            "{} != {}",
            short(&row.ledger_checksum),
            short(&row.file_checksum)
        ),
        MigrationState::Orphaned => short(&row.ledger_checksum),
        MigrationState::Pending | MigrationState::AppliedOk => short(&row.file_checksum),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "format_helpers_test.rs"]
mod tests;

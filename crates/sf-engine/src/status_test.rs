use super::*;
use chrono::NaiveDate;
use sf_core::{Direction, LedgerEntry};
use std::path::PathBuf;

fn file(version: &str, checksum: &str) -> MigrationFile {
    MigrationFile {
        version: Version::new(version),
        direction: Direction::Up,
        checksum: checksum.to_string(),
        content: String::new(),
        path: PathBuf::from(format!("{version}.up.sql")),
    }
}

fn applied_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn ledger(entries: &[(&str, &str)]) -> Ledger {
    entries
        .iter()
        .map(|(v, c)| {
            (
                Version::new(*v),
                LedgerEntry {
                    version: Version::new(*v),
                    checksum: c.to_string(),
                    applied_at: applied_at(),
                },
            )
        })
        .collect()
}

#[test]
fn test_empty_inputs_give_empty_report() {
    let report = StatusReport::build(&[], &Ledger::new());
    assert!(report.is_empty());
    assert_eq!(report.counts, StatusCounts::default());
}

#[test]
fn test_all_four_states_in_version_order() {
    let files = vec![
        file("0001_users", "a1"),
        file("0002_orders", "b2"),
        file("0004_items", "d4"),
    ];
    let ledger = ledger(&[
        ("0001_users", "a1"),
        ("0002_orders", "zz"),
        ("0003_dropped", "c3"),
    ]);

    let report = StatusReport::build(&files, &ledger);
    let states: Vec<(&str, MigrationState)> = report
        .rows
        .iter()
        .map(|r| (r.version.as_str(), r.state))
        .collect();
    assert_eq!(
        states,
        vec![
            ("0001_users", MigrationState::AppliedOk),
            ("0002_orders", MigrationState::AppliedMismatch),
            ("0003_dropped", MigrationState::Orphaned),
            ("0004_items", MigrationState::Pending),
        ]
    );
    assert_eq!(
        report.counts,
        StatusCounts {
            total: 4,
            applied: 1,
            pending: 1,
            mismatched: 1,
            orphaned: 1,
        }
    );
}

#[test]
fn test_mismatch_row_carries_both_checksums() {
    let report = StatusReport::build(
        &[file("0001_users", "b2")],
        &ledger(&[("0001_users", "a1")]),
    );
    let row = report.mismatches().next().unwrap();
    assert_eq!(row.file_checksum.as_deref(), Some("b2"));
    assert_eq!(row.ledger_checksum.as_deref(), Some("a1"));
    assert_eq!(row.applied_at, Some(applied_at()));
}

#[test]
fn test_orphan_row_has_no_file_checksum() {
    let report = StatusReport::build(&[], &ledger(&[("0009_gone", "f9")]));
    let orphans: Vec<_> = report.orphans().collect();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].file_checksum, None);
    assert_eq!(orphans[0].ledger_checksum.as_deref(), Some("f9"));
}

#[test]
fn test_pending_row_has_no_ledger_fields() {
    let report = StatusReport::build(&[file("0001_users", "a1")], &Ledger::new());
    let row = &report.rows[0];
    assert_eq!(row.state, MigrationState::Pending);
    assert_eq!(row.ledger_checksum, None);
    assert_eq!(row.applied_at, None);
    assert_eq!(report.counts.pending, 1);
}

#[test]
fn test_report_serializes_states_in_kebab_case() {
    let report = StatusReport::build(
        &[file("0001_users", "b2")],
        &ledger(&[("0001_users", "a1")]),
    );
    let json = serde_json::to_value(&report.rows[0]).unwrap();
    assert_eq!(json["state"], "applied-mismatch");
    assert_eq!(json["ledger_checksum"], "a1");
}

use super::*;
use std::fs;
use tempfile::tempdir;

fn global(project_dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.to_path_buf(),
        config: None,
        database: None,
        migrations_dir: None,
    }
}

#[test]
fn test_load_project_without_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let project = load_project(&global(dir.path())).unwrap();

    assert_eq!(project.migrations_dir(), dir.path().join("migrations"));
    assert_eq!(project.database_path(), MEMORY_DB_PATH);
    assert_eq!(project.config.ledger_table, "schema_migrations");
}

#[test]
fn test_load_project_reads_config_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("schemaflow.yml"),
        "migrations_dir: db/migrations\nledger_table: applied_versions\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();

    let project = load_project(&global(dir.path())).unwrap();
    assert_eq!(project.migrations_dir(), dir.path().join("db/migrations"));
    assert_eq!(
        project.database_path(),
        dir.path().join("app.duckdb").display().to_string()
    );
    assert_eq!(project.config.ledger_table, "applied_versions");
}

#[test]
fn test_cli_overrides_win_over_config_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("schemaflow.yml"),
        "migrations_dir: db/migrations\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();

    let mut args = global(dir.path());
    args.migrations_dir = Some(PathBuf::from("sql"));
    args.database = Some(":memory:".to_string());

    let project = load_project(&args).unwrap();
    assert_eq!(project.migrations_dir(), dir.path().join("sql"));
    assert_eq!(project.database_path(), MEMORY_DB_PATH);
}

#[test]
fn test_explicit_config_path_must_exist() {
    let dir = tempdir().unwrap();
    let mut args = global(dir.path());
    args.config = Some(dir.path().join("missing.yml"));

    let err = load_project(&args).unwrap_err();
    assert!(format!("{err:#}").contains("C001"), "{err:#}");
}

#[test]
fn test_empty_migrations_dir_override_is_rejected() {
    let dir = tempdir().unwrap();
    let mut args = global(dir.path());
    args.migrations_dir = Some(PathBuf::new());

    assert!(load_project(&args).is_err());
}

#[test]
fn test_read_only_open_does_not_create_database_file() {
    let dir = tempdir().unwrap();
    let mut args = global(dir.path());
    args.database = Some("app.duckdb".to_string());
    let project = load_project(&args).unwrap();

    let backend = project.open_backend_read_only().unwrap();
    assert!(!backend.table_exists("schema_migrations").unwrap());
    assert!(!dir.path().join("app.duckdb").exists());
}

#[test]
fn test_format_table_aligns_columns() {
    let table = format_table(
        &["VERSION", "STATUS"],
        &[
            vec!["0001_users".to_string(), "applied-ok".to_string()],
            vec!["0002_orders_long".to_string(), "pending".to_string()],
        ],
    );
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "VERSION           STATUS");
    assert_eq!(lines[1], "----------------  ----------");
    assert_eq!(lines[2], "0001_users        applied-ok");
    assert_eq!(lines[3], "0002_orders_long  pending");
}

#[tokio::test]
async fn test_run_blocking_returns_work_result() {
    let value = run_blocking(|cancel| {
        assert!(!cancel.is_cancelled());
        Ok(42)
    })
    .await
    .unwrap();
    assert_eq!(value, 42);
}

#[tokio::test]
async fn test_run_blocking_propagates_errors() {
    let err = run_blocking(|_| -> Result<()> { anyhow::bail!("boom") })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "boom");
}

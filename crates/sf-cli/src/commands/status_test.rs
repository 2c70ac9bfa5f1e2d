use super::*;
use std::fs;
use tempfile::tempdir;

fn global(project_dir: &std::path::Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.to_path_buf(),
        config: None,
        database: Some("app.duckdb".to_string()),
        migrations_dir: None,
    }
}

#[tokio::test]
async fn test_status_on_fresh_project_creates_nothing() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(migrations.join("0001_users.up.sql"), "CREATE TABLE users (id INTEGER);").unwrap();

    let args = StatusArgs {
        output: StatusOutput::Table,
    };
    execute(&args, &global(dir.path())).await.unwrap();

    assert!(!dir.path().join("app.duckdb").exists());
}

#[tokio::test]
async fn test_status_json_output() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("migrations")).unwrap();

    let args = StatusArgs {
        output: StatusOutput::Json,
    };
    execute(&args, &global(dir.path())).await.unwrap();
}

#[tokio::test]
async fn test_status_with_default_in_memory_database() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("migrations")).unwrap();
    let global = GlobalArgs {
        database: None,
        ..global(dir.path())
    };

    let project = load_project(&global).unwrap();
    assert_eq!(project.database_path(), sf_core::config::MEMORY_DB_PATH);

    let args = StatusArgs {
        output: StatusOutput::Table,
    };
    execute(&args, &global).await.unwrap();

    let backend = project.open_backend_read_only().unwrap();
    let report = Migrator::new(&backend, project.settings()).status().unwrap();
    assert_eq!(report.counts.total, 0);
}

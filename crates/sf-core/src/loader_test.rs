use super::*;
use std::fs;
use tempfile::tempdir;

const UP: &str = ".up.sql";
const DOWN: &str = ".down.sql";

fn write(dir: &Path, name: &str, content: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(dir.join(name), content).unwrap();
}

fn versions(files: &[MigrationFile]) -> Vec<&str> {
    files.iter().map(|m| m.version.as_str()).collect()
}

#[test]
fn test_load_sorted_by_version() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0002_add_price.up.sql", "ALTER TABLE products ADD price INT;");
    write(dir.path(), "0001_create_products.up.sql", "CREATE TABLE products (id INT);");
    write(dir.path(), "0010_index.up.sql", "CREATE INDEX idx ON products (id);");

    let files = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert_eq!(
        versions(&files),
        vec!["0001_create_products", "0002_add_price", "0010_index"]
    );
    assert!(files.iter().all(|m| m.direction == Direction::Up));
}

#[test]
fn test_load_filters_by_direction_suffix() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0001_a.up.sql", "CREATE TABLE a (id INT);");
    write(dir.path(), "0001_a.down.sql", "DROP TABLE a;");
    write(dir.path(), "README.md", "not a migration");

    let up = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    let down = load_migrations(dir.path(), Direction::Down, DOWN).unwrap();

    assert_eq!(versions(&up), vec!["0001_a"]);
    assert_eq!(versions(&down), vec!["0001_a"]);
    assert_eq!(down[0].content, "DROP TABLE a;");
    assert_eq!(down[0].direction, Direction::Down);
}

#[test]
fn test_load_suffix_is_case_insensitive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0001_shout.UP.SQL", "SELECT 1;");

    let files = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert_eq!(versions(&files), vec!["0001_shout"]);
}

#[test]
fn test_load_walks_subdirectories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "2024/0002_b.up.sql", "SELECT 2;");
    write(dir.path(), "0001_a.up.sql", "SELECT 1;");

    let files = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert_eq!(versions(&files), vec!["0001_a", "0002_b"]);
}

#[test]
fn test_load_rejects_duplicate_versions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/0001_x.up.sql", "SELECT 1;");
    write(dir.path(), "b/0001_x.up.sql", "SELECT 2;");

    let err = load_migrations(dir.path(), Direction::Up, UP).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateMigration { ref version, .. } if version == "0001_x"));
}

#[test]
fn test_load_empty_directory_is_not_an_error() {
    let dir = tempdir().unwrap();
    let files = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_load_missing_directory_is_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = load_migrations(&missing, Direction::Up, UP).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_load_skips_file_named_only_suffix() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".up.sql", "SELECT 1;");
    let files = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_load_rejects_non_utf8() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("0001_bin.up.sql"), [0xff, 0xfe, 0x00]).unwrap();
    let err = load_migrations(dir.path(), Direction::Up, UP).unwrap_err();
    assert!(matches!(err, CoreError::InvalidEncoding { .. }));
}

#[test]
fn test_checksum_is_deterministic_across_loads() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0001_a.up.sql", "CREATE TABLE a (id INT);\n");

    let first = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    let second = load_migrations(dir.path(), Direction::Up, UP).unwrap();
    assert_eq!(first[0].checksum, second[0].checksum);
}

#[test]
fn test_checksum_changes_on_whitespace_edit() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0001_a.up.sql", "CREATE TABLE a (id INT);");
    let before = load_migrations(dir.path(), Direction::Up, UP).unwrap();

    write(dir.path(), "0001_a.up.sql", "CREATE TABLE a (id INT);\n");
    let after = load_migrations(dir.path(), Direction::Up, UP).unwrap();

    assert_ne!(before[0].checksum, after[0].checksum);
}

#[test]
fn test_strip_suffix_ignore_case() {
    assert_eq!(strip_suffix_ignore_case("0001_a.up.sql", UP), Some("0001_a"));
    assert_eq!(strip_suffix_ignore_case("0001_a.Up.Sql", UP), Some("0001_a"));
    assert_eq!(strip_suffix_ignore_case("0001_a.down.sql", UP), None);
    assert_eq!(strip_suffix_ignore_case("sql", UP), None);
    assert_eq!(strip_suffix_ignore_case("é.up.sql", UP), Some("é"));
}

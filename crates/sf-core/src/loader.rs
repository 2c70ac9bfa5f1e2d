//! Migration loader: discovers versioned SQL files under a directory.

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationFile};
use crate::version::Version;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load every migration file under `dir` whose name ends with `suffix`.
///
/// The directory is walked recursively. A file qualifies when its name ends
/// with `suffix` (ASCII case-insensitive); its version is the filename with
/// the suffix stripped. Results are sorted ascending by version.
///
/// An unreadable directory is an error; a directory with no qualifying files
/// yields an empty list.
pub fn load_migrations(
    dir: &Path,
    direction: Direction,
    suffix: &str,
) -> CoreResult<Vec<MigrationFile>> {
    let mut paths = Vec::new();
    collect_matching_files(dir, suffix, &mut paths)?;

    let mut migrations = Vec::with_capacity(paths.len());
    let mut seen: HashMap<Version, PathBuf> = HashMap::new();

    for (path, version) in paths {
        if let Some(first) = seen.get(&version) {
            return Err(CoreError::DuplicateMigration {
                version: version.into_inner(),
                first: first.display().to_string(),
                second: path.display().to_string(),
            });
        }
        seen.insert(version.clone(), path.clone());

        let bytes = std::fs::read(&path).map_err(|e| CoreError::io(&path, e))?;
        let checksum = compute_checksum(&bytes);
        let content = String::from_utf8(bytes).map_err(|_| CoreError::InvalidEncoding {
            path: path.display().to_string(),
        })?;

        log::debug!(
            "Loaded {} migration {} ({})",
            direction,
            version,
            path.display()
        );
        migrations.push(MigrationFile {
            version,
            direction,
            checksum,
            content,
            path,
        });
    }

    migrations.sort_by(|a, b| a.version.cmp(&b.version));
    Ok(migrations)
}

/// Strip `suffix` from `name`, ignoring ASCII case.
///
/// Returns `None` when the name does not end with the suffix.
pub fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.as_bytes().get(split..)?;
    if !tail.eq_ignore_ascii_case(suffix.as_bytes()) {
        return None;
    }
    // `get` refuses a split inside a multi-byte char.
    name.get(..split)
}

/// Recursively collect `(path, version)` pairs for qualifying files.
fn collect_matching_files(
    dir: &Path,
    suffix: &str,
    out: &mut Vec<(PathBuf, Version)>,
) -> CoreResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_matching_files(&path, suffix, out)?;
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = strip_suffix_ignore_case(name, suffix) else {
            continue;
        };
        match Version::try_new(stem) {
            Some(version) => out.push((path, version)),
            None => log::warn!("Skipping {}: empty migration version", path.display()),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;

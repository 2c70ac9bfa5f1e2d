//! Configuration types and parsing for schemaflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in the project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["schemaflow.yml", "schemaflow.yaml"];

/// Database path that opens an in-memory database.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Migration runner configuration from schemaflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Filename suffix of forward migrations
    #[serde(default = "default_forward_suffix")]
    pub forward_suffix: String,

    /// Filename suffix of reverse migrations
    #[serde(default = "default_reverse_suffix")]
    pub reverse_suffix: String,

    /// Name of the ledger table
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// How each migration file is wrapped when executed
    #[serde(default)]
    pub transaction_mode: TransactionMode,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Transaction policy for executing a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    /// Wrap each file and its ledger write in one transaction
    #[default]
    PerMigration,
    /// Auto-commit each statement; a failure can leave a file half-applied
    None,
}

impl std::fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionMode::PerMigration => write!(f, "per_migration"),
            TransactionMode::None => write!(f, "none"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            forward_suffix: default_forward_suffix(),
            reverse_suffix: default_reverse_suffix(),
            ledger_table: default_ledger_table(),
            transaction_mode: TransactionMode::default(),
            database: DatabaseConfig::default(),
        }
    }
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_forward_suffix() -> String {
    ".up.sql".to_string()
}

fn default_reverse_suffix() -> String {
    ".down.sql".to_string()
}

fn default_ledger_table() -> String {
    "schema_migrations".to_string()
}

fn default_db_path() -> String {
    MEMORY_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for schemaflow.yml or schemaflow.yaml; falls back to defaults
    /// when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.forward_suffix.is_empty() || self.reverse_suffix.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "forward_suffix and reverse_suffix cannot be empty".to_string(),
            });
        }

        if self
            .forward_suffix
            .eq_ignore_ascii_case(&self.reverse_suffix)
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "forward_suffix and reverse_suffix must differ (both are '{}')",
                    self.forward_suffix
                ),
            });
        }

        if self.ledger_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "ledger_table cannot be empty".to_string(),
            });
        }

        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Migrations directory resolved against `root`
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Database path resolved against `root` (`:memory:` is left untouched)
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.path == MEMORY_DB_PATH {
            return self.database.path.clone();
        }
        root.join(&self.database.path).display().to_string()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

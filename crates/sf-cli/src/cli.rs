//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Schemaflow - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file to migrate (`:memory:` for a throwaway database)
    #[arg(short, long, global = true, env = "DATABASE_PATH")]
    pub database: Option<String>,

    /// Directory containing migration files
    #[arg(short, long, global = true, env = "SCHEMAFLOW_MIGRATIONS_DIR")]
    pub migrations_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending forward migrations in version order
    Up(RunArgs),

    /// Roll back every applied migration in reverse version order
    Down(RunArgs),

    /// Show applied, pending, mismatched and orphaned migrations
    Status(StatusArgs),
}

/// Arguments for the up and down commands
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Show what would run without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

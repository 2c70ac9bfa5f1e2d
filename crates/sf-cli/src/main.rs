//! Schemaflow CLI - versioned SQL schema migrations

use anyhow::Result;
use clap::Parser;
use sf_core::Direction;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{migrate, status};

#[tokio::main]
async fn main() {
    // Optional .env next to the invocation
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(err) = dotenv {
        if !err.not_found() {
            log::warn!("Ignoring .env: {err}");
        }
    }

    if let Err(err) = run(&cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Up(args) => migrate::execute(Direction::Up, args, &cli.global).await,
        Commands::Down(args) => migrate::execute(Direction::Down, args, &cli.global).await,
        Commands::Status(args) => status::execute(args, &cli.global).await,
    }
}

/// Route `log` records from the library crates to stderr.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

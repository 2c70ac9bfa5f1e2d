//! Up and down command implementation

use anyhow::Result;
use sf_core::Direction;
use sf_engine::Migrator;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::{load_project, run_blocking};
use crate::commands::format_helpers::format_run_summary;

/// Execute `up` or `down`
pub async fn execute(direction: Direction, args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrations_dir = project.migrations_dir();
    let dry_run = args.dry_run;

    if dry_run {
        println!("Dry run - no changes will be made");
    }

    let summary = run_blocking(move |cancel| {
        let backend = if dry_run {
            project.open_backend_read_only()?
        } else {
            project.open_backend()?
        };
        let summary = Migrator::new(&backend, project.settings())
            .with_cancel_flag(cancel)
            .run(direction, dry_run)?;
        Ok(summary)
    })
    .await?;

    print!("{}", format_run_summary(&summary, &migrations_dir));
    Ok(())
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;

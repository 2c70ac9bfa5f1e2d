//! Status command implementation

use anyhow::{Context, Result};
use sf_engine::Migrator;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_project, run_blocking};
use crate::commands::format_helpers::format_status;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;

    let report = run_blocking(move |_cancel| {
        let backend = project.open_backend_read_only()?;
        let report = Migrator::new(&backend, project.settings()).status()?;
        Ok(report)
    })
    .await?;

    match args.output {
        StatusOutput::Table => print!("{}", format_status(&report)),
        StatusOutput::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;

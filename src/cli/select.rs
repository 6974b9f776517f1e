//! Select command implementation.

use colored::Colorize;

use crate::cli::args::SelectCommand;
use crate::core::provider::Provider;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig, Selection};

/// Execute the select command.
pub async fn execute(cmd: &SelectCommand, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    let selection = match cmd {
        SelectCommand::Provider { name } => {
            let provider = Provider::from_cli_name(name)?;
            orchestrator.set_provider(provider)?
        }
        SelectCommand::Model { name } => orchestrator.set_model(name)?,
    };

    if resolved.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    print_selection(&selection);

    if selection.provider.requires_api_key() && !orchestrator.has_key(selection.provider) {
        println!(
            "{}",
            format!(
                "Note: no API key is set for {}. Run `inkwright key set {}` before processing.",
                selection.provider.display_name(),
                selection.provider.cli_name()
            )
            .yellow()
        );
    }

    Ok(())
}

fn print_selection(selection: &Selection) {
    println!(
        "Active: {} (model: {})",
        selection.provider.display_name().cyan().bold(),
        selection.model.as_deref().unwrap_or("none")
    );
}

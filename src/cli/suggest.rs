//! Suggest command implementation.

use colored::Colorize;

use crate::cli::args::SuggestArgs;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};

/// Execute the suggest command.
pub async fn execute(args: &SuggestArgs, resolved: &ResolvedConfig) -> Result<()> {
    let context = crate::cli::read_input(args.context.as_deref(), args.file.as_deref())?;

    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    let suggestions = orchestrator.generate_suggestions(&context).await;

    if resolved.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("Nothing to suggest for an empty passage.");
        return Ok(());
    }

    println!("{}", "Suggestions:".bold());
    for suggestion in &suggestions {
        println!("  {} {}", "-".cyan(), suggestion);
    }

    Ok(())
}

//! Process command implementation.

use colored::Colorize;

use crate::cli::args::ProcessArgs;
use crate::core::orchestrator::Origin;
use crate::core::prompt::Action;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};
use crate::util::word_count;

/// Execute the process command.
pub async fn execute(args: &ProcessArgs, resolved: &ResolvedConfig) -> Result<()> {
    let action = Action::from_cli_name(&args.action)?;
    let text = crate::cli::read_input(args.text.as_deref(), args.file.as_deref())?;

    let paths = AppPaths::new();
    let mut settings = ProcessingSettings::load(&paths);
    if args.no_cache {
        settings.cache_enabled = false;
    }
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    tracing::debug!(action = %action, chars = text.chars().count(), "processing text");
    let outcome = orchestrator.process_text(&text, action).await?;
    let selection = orchestrator.selection();

    if resolved.json {
        let payload = ProcessPayload {
            action: action.cli_name(),
            provider: selection.provider.cli_name(),
            model: selection.model,
            origin: outcome.origin,
            words: word_count(&outcome.text),
            text: &outcome.text,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", outcome.text);

    // Provenance note goes to stderr so stdout stays pipeable
    let note = match outcome.origin {
        Origin::Live => format!(
            "{} via {}",
            selection.provider.display_name(),
            selection.model.as_deref().unwrap_or("?")
        ),
        Origin::Offline => "offline processor".to_string(),
        Origin::Cache => "cached".to_string(),
    };
    eprintln!(
        "{}",
        format!("[{} | {} words]", note, word_count(&outcome.text)).dimmed()
    );

    Ok(())
}

#[derive(serde::Serialize)]
struct ProcessPayload<'a> {
    action: &'a str,
    provider: &'a str,
    model: Option<String>,
    origin: Origin,
    words: usize,
    text: &'a str,
}

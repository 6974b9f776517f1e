//! Models command implementation.

use colored::Colorize;

use crate::cli::args::ModelsArgs;
use crate::core::provider::Provider;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};

/// Execute the models command.
pub async fn execute(args: &ModelsArgs, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    let provider = match &args.provider {
        Some(name) => Provider::from_cli_name(name)?,
        None => orchestrator.selection().provider,
    };

    if args.refresh {
        for (daemon, result) in orchestrator.refresh_local_models().await {
            match result {
                Ok(count) => {
                    tracing::info!(provider = %daemon, models = count, "model catalog refreshed");
                }
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("{}: refresh failed: {}", daemon.display_name(), e).yellow()
                    );
                }
            }
        }
    }

    let descriptor = orchestrator.registry().get(provider)?;
    let selection = orchestrator.selection();

    if resolved.json {
        let payload = ModelsPayload {
            provider: provider.cli_name(),
            models: descriptor.models.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if descriptor.models.is_empty() {
        println!("No models listed for {}.", provider.display_name());
        if provider.is_local_daemon() {
            println!("Start the daemon and run `inkwright models {} --refresh`.", provider.cli_name());
        }
        return Ok(());
    }

    println!("{}", format!("Models for {}:", provider.display_name()).bold());
    for model in &descriptor.models {
        let marker = if selection.provider == provider && selection.model.as_deref() == Some(model)
        {
            "*".cyan().bold().to_string()
        } else {
            " ".to_string()
        };
        println!("  {marker} {model}");
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct ModelsPayload {
    provider: &'static str,
    models: Vec<String>,
}

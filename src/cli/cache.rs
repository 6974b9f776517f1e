//! Cache command implementation.

use colored::Colorize;

use crate::cli::args::CacheCommand;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};

/// Execute the cache command.
///
/// The response cache lives in memory for the life of a process, so these
/// subcommands mostly matter to long-running embedders; the CLI shows the
/// configured behavior.
pub async fn execute(cmd: &CacheCommand, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);

    match cmd {
        CacheCommand::Clear => {
            let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;
            orchestrator.clear_cache();
            println!("Response cache cleared.");
        }

        CacheCommand::Stats => {
            if resolved.json {
                let payload = CachePayload {
                    enabled: settings.cache_enabled,
                    expiry_ms: settings.cache_expiry_ms,
                };
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            let state = if settings.cache_enabled {
                "enabled".green().to_string()
            } else {
                "disabled".red().to_string()
            };
            println!("Response cache: {state}");
            println!(
                "Entry lifetime: {}s",
                settings.cache_expiry_ms / 1000
            );
            println!("Entries live in memory for the duration of a process.");
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct CachePayload {
    enabled: bool,
    expiry_ms: u64,
}

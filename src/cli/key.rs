//! Key command implementation.

use std::io::BufRead;

use colored::Colorize;

use crate::cli::args::KeyCommand;
use crate::core::provider::Provider;
use crate::error::{InkwrightError, Result};
use crate::storage::{AppPaths, CredentialStore, ResolvedConfig, key_format_warning};
use crate::util::mask_key;

/// Execute the key command.
pub async fn execute(cmd: &KeyCommand, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let mut store = CredentialStore::open(&paths)?;

    match cmd {
        KeyCommand::Set { provider, key } => {
            let provider = Provider::from_cli_name(provider)?;
            if !provider.requires_api_key() {
                println!(
                    "{} runs locally and does not use an API key.",
                    provider.display_name()
                );
                return Ok(());
            }

            let key = match key {
                Some(key) => key.clone(),
                None => read_key_from_stdin()?,
            };
            if key.trim().is_empty() {
                return Err(InkwrightError::Config("refusing to store an empty key".to_string()));
            }

            if let Some(warning) = key_format_warning(provider, &key) {
                eprintln!("{}", warning.yellow());
            }
            store.set_key(provider, &key)?;
            println!(
                "Key stored for {} ({})",
                provider.display_name().cyan(),
                mask_key(key.trim())
            );
        }

        KeyCommand::Unset { provider } => {
            let provider = Provider::from_cli_name(provider)?;
            store.remove_key(provider)?;
            println!("Key removed for {}", provider.display_name().cyan());
        }

        KeyCommand::List => {
            let configured = store.configured_providers();

            if resolved.json {
                let payload: Vec<KeyPayload> = configured
                    .iter()
                    .map(|&provider| KeyPayload {
                        provider: provider.cli_name(),
                        masked: store.get_key(provider).map(mask_key).unwrap_or_default(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            if configured.is_empty() {
                println!("No API keys configured.");
                println!("Keys file: {}", paths.api_keys_file().display());
                return Ok(());
            }

            println!("{:<14} {}", "Provider".bold(), "Key".bold());
            for provider in configured {
                let masked = store.get_key(provider).map(mask_key).unwrap_or_default();
                println!("{:<14} {}", provider.display_name(), masked.dimmed());
            }
        }
    }

    Ok(())
}

/// Read a key from the first line of stdin, keeping it out of shell history.
fn read_key_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[derive(serde::Serialize)]
struct KeyPayload {
    provider: &'static str,
    masked: String,
}

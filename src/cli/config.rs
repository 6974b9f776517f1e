//! Config command implementation.

use colored::Colorize;

use crate::cli::args::ConfigCommand;
use crate::error::{InkwrightError, Result};
use crate::storage::{AppPaths, Config, ProcessingSettings, ResolvedConfig};

/// Execute the config command.
pub async fn execute(cmd: &ConfigCommand, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();

    match cmd {
        ConfigCommand::Show => show(resolved, &paths),

        ConfigCommand::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }

        ConfigCommand::Init { force } => init(*force),

        ConfigCommand::Set { key, value } => {
            let mut settings = ProcessingSettings::load(&paths);
            settings.set_field(key, value)?;
            settings.save(&paths)?;
            println!("{} = {}", key.cyan(), value);
            Ok(())
        }

        ConfigCommand::Reset => {
            ProcessingSettings::default().save(&paths)?;
            println!("Processing settings reset to defaults.");
            Ok(())
        }
    }
}

fn show(resolved: &ResolvedConfig, paths: &AppPaths) -> Result<()> {
    let settings = ProcessingSettings::load(paths);

    if resolved.json {
        let payload = serde_json::json!({
            "timeout_seconds": resolved.timeout.as_secs(),
            "no_color": resolved.no_color,
            "verbose": resolved.verbose,
            "offline_delay_ms": {
                "min": resolved.offline_delay.min().as_millis() as u64,
                "max": resolved.offline_delay.max().as_millis() as u64,
            },
            "endpoint_overrides": resolved
                .endpoint_overrides
                .iter()
                .map(|(p, url)| serde_json::json!({ "provider": p.cli_name(), "endpoint": url }))
                .collect::<Vec<_>>(),
            "settings": settings,
            "config_path": Config::config_path(),
            "settings_path": paths.settings_file(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{}", "Resolved configuration:".bold());
    println!(
        "  {:<16} {:<12} ({})",
        "timeout",
        format!("{}s", resolved.timeout.as_secs()),
        resolved.sources.timeout
    );
    println!(
        "  {:<16} {:<12} ({})",
        "no_color", resolved.no_color, resolved.sources.no_color
    );
    println!(
        "  {:<16} {:<12} ({})",
        "verbose", resolved.verbose, resolved.sources.verbose
    );
    println!(
        "  {:<16} {:<12} ({})",
        "offline_delay",
        format!(
            "{}-{}ms",
            resolved.offline_delay.min().as_millis(),
            resolved.offline_delay.max().as_millis()
        ),
        resolved.sources.offline_delay
    );
    for (provider, endpoint) in &resolved.endpoint_overrides {
        println!("  {:<16} {} -> {}", "endpoint", provider.cli_name(), endpoint);
    }

    println!("\n{}", "Processing settings:".bold());
    println!("  {:<20} {}", "autoSuggest", settings.auto_suggest);
    println!("  {:<20} {}", "realTimeProcessing", settings.real_time_processing);
    println!("  {:<20} {}", "maxTokens", settings.max_tokens);
    println!("  {:<20} {}", "temperature", settings.temperature);
    println!("  {:<20} {}", "cacheEnabled", settings.cache_enabled);
    println!("  {:<20} {}", "cacheExpiryMs", settings.cache_expiry_ms);

    println!("\nConfig file:   {}", Config::config_path().display());
    println!("Settings file: {}", paths.settings_file().display());

    Ok(())
}

fn init(force: bool) -> Result<()> {
    let path = Config::config_path();
    if path.exists() && !force {
        return Err(InkwrightError::Config(format!(
            "config file already exists at {}; use --force to overwrite",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

//! Providers command implementation.

use colored::Colorize;

use crate::core::provider::ProviderKind;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};

/// Execute the providers command.
pub async fn execute(resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    let selection = orchestrator.selection();
    let descriptors = orchestrator.list_providers();

    if resolved.json {
        let payload: Vec<ProviderPayload> = descriptors
            .iter()
            .map(|d| ProviderPayload {
                provider: d.id.cli_name(),
                display_name: d.id.display_name(),
                requires_api_key: d.requires_api_key,
                has_key: orchestrator.has_key(d.id),
                active: d.id == selection.provider,
                models: d.models.clone(),
                endpoint: d.endpoint.clone(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{:<14} {:<8} {:<8} {:<8} {}",
        "Provider".bold(),
        "Key".bold(),
        "Models".bold(),
        "Active".bold(),
        "Endpoint".bold()
    );
    for descriptor in &descriptors {
        let key_cell = if !descriptor.requires_api_key {
            "-".dimmed().to_string()
        } else if orchestrator.has_key(descriptor.id) {
            "set".green().to_string()
        } else {
            "none".dimmed().to_string()
        };
        let active_cell = if descriptor.id == selection.provider {
            "*".cyan().bold().to_string()
        } else {
            String::new()
        };
        let endpoint_cell = match (&descriptor.endpoint, descriptor.kind) {
            (Some(url), _) => url.clone(),
            (None, ProviderKind::CustomEndpoint) => "unset".yellow().to_string(),
            (None, _) => String::new(),
        };
        println!(
            "{:<14} {:<8} {:<8} {:<8} {}",
            descriptor.id.display_name(),
            key_cell,
            descriptor.models.len(),
            active_cell,
            endpoint_cell
        );
    }

    println!(
        "\nActive: {} (model: {})",
        selection.provider.display_name().cyan(),
        selection.model.as_deref().unwrap_or("none")
    );

    Ok(())
}

#[derive(serde::Serialize)]
struct ProviderPayload {
    provider: &'static str,
    display_name: &'static str,
    requires_api_key: bool,
    has_key: bool,
    active: bool,
    models: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
}

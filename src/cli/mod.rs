//! CLI argument parsing and command dispatch.

pub mod args;
pub mod cache;
pub mod config;
pub mod key;
pub mod models;
pub mod probe;
pub mod process;
pub mod providers;
pub mod select;
pub mod suggest;

pub use args::{Cli, Commands};

use std::io::Read;
use std::path::Path;

use crate::core::Orchestrator;
use crate::error::{InkwrightError, Result};
use crate::storage::{AppPaths, CredentialStore, ProcessingSettings, ResolvedConfig};

/// Assemble the orchestrator from persisted state and resolved config.
pub(crate) fn build_orchestrator(
    resolved: &ResolvedConfig,
    paths: &AppPaths,
    settings: ProcessingSettings,
) -> Result<Orchestrator> {
    paths.ensure_dirs()?;
    let credentials = CredentialStore::open(paths)?;
    let orchestrator = Orchestrator::new(credentials, settings)?
        .with_timeout(resolved.timeout)?
        .with_offline_delay(resolved.offline_delay);
    orchestrator.apply_endpoint_overrides(&resolved.endpoint_overrides)?;
    Ok(orchestrator)
}

/// Read input text from an inline argument, a file, or stdin, in that order.
pub(crate) fn read_input(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_string());
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path).map_err(|e| InkwrightError::Storage {
            path: path.display().to_string(),
            detail: e.to_string(),
        });
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end().to_string())
}

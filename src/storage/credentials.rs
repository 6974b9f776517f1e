//! Persisted API keys and provider/model selection.
//!
//! Keys and the current selection live in three small JSON files under the
//! data directory. Every mutation persists synchronously, so a crash never
//! loses more than the in-flight change. Unreadable files degrade to
//! defaults with a warning instead of refusing to start; losing a stored
//! selection is recoverable, losing the ability to launch is not.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::provider::Provider;
use crate::error::{InkwrightError, Result};
use crate::storage::AppPaths;

// =============================================================================
// Selection
// =============================================================================

/// Current provider and model choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub provider: Provider,
    /// Absent when the provider's model list is empty (undiscovered daemon).
    pub model: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        let provider = Provider::OpenAi;
        Self {
            provider,
            model: provider.default_models().first().map(|m| (*m).to_string()),
        }
    }
}

// =============================================================================
// Credential store
// =============================================================================

/// Holds the provider→key map and the active selection.
#[derive(Debug)]
pub struct CredentialStore {
    keys_path: PathBuf,
    provider_path: PathBuf,
    model_path: PathBuf,
    keys: HashMap<Provider, String>,
    selection: Selection,
}

impl CredentialStore {
    /// Load persisted credentials and selection, creating the data directory
    /// if needed.
    pub fn open(paths: &AppPaths) -> Result<Self> {
        fs::create_dir_all(&paths.data).map_err(|e| storage_error(&paths.data, &e))?;

        let keys_path = paths.api_keys_file();
        let provider_path = paths.selected_provider_file();
        let model_path = paths.selected_model_file();

        let keys: HashMap<Provider, String> = read_json(&keys_path).unwrap_or_default();
        let provider: Provider =
            read_json(&provider_path).unwrap_or(Selection::default().provider);
        let stored_model: Option<String> = read_json(&model_path);

        let catalog = provider.default_models();
        let model = match stored_model {
            Some(m) if catalog.is_empty() || catalog.contains(&m.as_str()) => Some(m),
            Some(m) => {
                tracing::warn!(
                    provider = %provider,
                    model = %m,
                    "stored model is not offered by the stored provider, reverting to its first model"
                );
                catalog.first().map(|s| (*s).to_string())
            }
            None => catalog.first().map(|s| (*s).to_string()),
        };

        Ok(Self {
            keys_path,
            provider_path,
            model_path,
            keys,
            selection: Selection { provider, model },
        })
    }

    /// The configured key for a provider, if one is set.
    #[must_use]
    pub fn get_key(&self, provider: Provider) -> Option<&str> {
        self.keys
            .get(&provider)
            .map(String::as_str)
            .filter(|k| !k.is_empty())
    }

    /// Store a key for a provider. Whitespace is trimmed; an empty key
    /// removes the entry.
    pub fn set_key(&mut self, provider: Provider, key: &str) -> Result<()> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            self.keys.remove(&provider);
        } else {
            self.keys.insert(provider, trimmed.to_string());
        }
        self.persist_keys()
    }

    /// Remove a provider's key.
    pub fn remove_key(&mut self, provider: Provider) -> Result<()> {
        self.keys.remove(&provider);
        self.persist_keys()
    }

    /// Providers that currently have a key configured. Never exposes key
    /// material.
    #[must_use]
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .iter()
            .copied()
            .filter(|p| self.get_key(*p).is_some())
            .collect()
    }

    /// The active selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Switch to a provider, given that provider's current model list.
    ///
    /// If the previously selected model is not in the new provider's list,
    /// the selection moves to the list's first model, or clears when the
    /// list is empty.
    pub fn set_provider(&mut self, provider: Provider, models: &[String]) -> Result<()> {
        let model_carries_over = self
            .selection
            .model
            .as_deref()
            .is_some_and(|m| models.iter().any(|candidate| candidate == m));

        self.selection.provider = provider;
        if !model_carries_over {
            let corrected = models.first().cloned();
            tracing::debug!(
                provider = %provider,
                model = corrected.as_deref().unwrap_or("(none)"),
                "selection model corrected for new provider"
            );
            self.selection.model = corrected;
        }
        self.persist_selection()
    }

    /// Select a model for the current provider.
    ///
    /// The model must be in `models` unless that list is empty (a daemon
    /// whose catalog has not been discovered yet).
    pub fn set_model(&mut self, model: &str, models: &[String]) -> Result<()> {
        if !models.is_empty() && !models.iter().any(|candidate| candidate == model) {
            return Err(InkwrightError::UnknownModel {
                provider: self.selection.provider.display_name().to_string(),
                model: model.to_string(),
            });
        }
        self.selection.model = Some(model.to_string());
        self.persist_selection()
    }

    fn persist_keys(&self) -> Result<()> {
        write_json(&self.keys_path, &self.keys)
    }

    fn persist_selection(&self) -> Result<()> {
        write_json(&self.provider_path, &self.selection.provider)?;
        match &self.selection.model {
            Some(model) => write_json(&self.model_path, model)?,
            None => {
                if self.model_path.exists() {
                    fs::remove_file(&self.model_path)
                        .map_err(|e| storage_error(&self.model_path, &e))?;
                }
            }
        }
        Ok(())
    }
}

/// Warn-only key shape check; a mismatch is a hint, never a rejection.
#[must_use]
pub fn key_format_warning(provider: Provider, key: &str) -> Option<String> {
    let hint = provider.key_prefix_hint()?;
    if key.trim().starts_with(hint) {
        None
    } else {
        Some(format!(
            "{} keys usually start with '{hint}'",
            provider.display_name()
        ))
    }
}

// =============================================================================
// File helpers
// =============================================================================

/// Read and parse a JSON file; missing or unreadable files yield `None`.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable storage file, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt storage file, using defaults");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content =
        serde_json::to_string_pretty(value).map_err(|e| storage_error(path, &e))?;
    fs::write(path, content).map_err(|e| storage_error(path, &e))
}

fn storage_error(path: &Path, e: &dyn std::fmt::Display) -> InkwrightError {
    InkwrightError::Storage {
        path: path.display().to_string(),
        detail: e.to_string(),
    }
}

//! Persisted processing settings.
//!
//! The tuning blob that shapes every request: token and temperature bounds,
//! cache behavior, and the assist toggles. Persisted as camelCase JSON under
//! the data directory; unreadable files degrade to defaults with a warning.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::dispatch::RequestParams;
use crate::error::{InkwrightError, Result};
use crate::storage::AppPaths;

/// Request and cache tuning, mutated through `config set` and persisted on
/// every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingSettings {
    /// Whether contextual suggestions run automatically while writing.
    pub auto_suggest: bool,
    /// Whether processing triggers on pauses rather than explicit requests.
    pub real_time_processing: bool,
    /// Output token ceiling forwarded to providers.
    pub max_tokens: u32,
    /// Sampling temperature forwarded to providers.
    pub temperature: f64,
    /// Whether the response cache participates in processing.
    pub cache_enabled: bool,
    /// Cache entry lifetime in milliseconds.
    pub cache_expiry_ms: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            auto_suggest: true,
            real_time_processing: false,
            max_tokens: 2048,
            temperature: 0.7,
            cache_enabled: true,
            cache_expiry_ms: 3_600_000,
        }
    }
}

impl ProcessingSettings {
    /// Load settings from the standard location; missing or unreadable
    /// files yield defaults.
    #[must_use]
    pub fn load(paths: &AppPaths) -> Self {
        Self::load_from(&paths.settings_file())
    }

    /// Load settings from a specific path.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable settings file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to the standard location.
    pub fn save(&self, paths: &AppPaths) -> Result<()> {
        self.save_to(&paths.settings_file())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| storage_error(path, &e))?;
        fs::write(path, content).map_err(|e| storage_error(path, &e))
    }

    /// Cache entry lifetime as a [`Duration`].
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_expiry_ms)
    }

    /// Sampling parameters for outbound requests.
    #[must_use]
    pub const fn request_params(&self) -> RequestParams {
        RequestParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Check value bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 || self.max_tokens > 32_768 {
            return Err(invalid(
                "maxTokens",
                &self.max_tokens.to_string(),
                "must be between 1 and 32768",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid(
                "temperature",
                &self.temperature.to_string(),
                "must be between 0.0 and 2.0",
            ));
        }
        if self.cache_expiry_ms < 1_000 {
            return Err(invalid(
                "cacheExpiryMs",
                &self.cache_expiry_ms.to_string(),
                "must be at least 1000",
            ));
        }
        Ok(())
    }

    /// Set a field by its persisted camelCase name, validating the result.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "autoSuggest" => updated.auto_suggest = parse_bool(key, value)?,
            "realTimeProcessing" => updated.real_time_processing = parse_bool(key, value)?,
            "maxTokens" => {
                updated.max_tokens = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a positive integer"))?;
            }
            "temperature" => {
                updated.temperature = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a number"))?;
            }
            "cacheEnabled" => updated.cache_enabled = parse_bool(key, value)?,
            "cacheExpiryMs" => {
                updated.cache_expiry_ms = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected milliseconds as an integer"))?;
            }
            _ => {
                return Err(invalid(
                    key,
                    value,
                    "unknown setting; valid keys: autoSuggest, realTimeProcessing, maxTokens, temperature, cacheEnabled, cacheExpiryMs",
                ));
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, message: &str) -> InkwrightError {
    InkwrightError::ConfigInvalid {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

fn storage_error(path: &Path, e: &dyn std::fmt::Display) -> InkwrightError {
    InkwrightError::Storage {
        path: path.display().to_string(),
        detail: e.to_string(),
    }
}

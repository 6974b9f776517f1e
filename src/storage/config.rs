//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux/macOS: `~/.config/inkwright/config.toml`
//! - Windows: `%APPDATA%/inkwright/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `INKWRIGHT_TIMEOUT`: Request timeout in seconds
//! - `INKWRIGHT_NO_COLOR` or `NO_COLOR`: Disable colors (1, true, yes)
//! - `INKWRIGHT_VERBOSE`: Enable verbose output (1, true, yes)
//! - `INKWRIGHT_JSON`: Emit JSON output (1, true, yes)
//! - `INKWRIGHT_CONFIG`: Override config file path

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::Cli;
use crate::core::logging::LogLevel;
use crate::core::offline::ProcessingDelay;
use crate::core::provider::Provider;
use crate::error::{InkwrightError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "INKWRIGHT_TIMEOUT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "INKWRIGHT_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for verbose output.
pub const ENV_VERBOSE: &str = "INKWRIGHT_VERBOSE";
/// Environment variable for JSON output.
pub const ENV_JSON: &str = "INKWRIGHT_JSON";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "INKWRIGHT_CONFIG";

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Request timeout for live dispatches.
    pub timeout: Duration,
    /// Whether to disable colored output.
    pub no_color: bool,
    /// Whether verbose logging is enabled.
    pub verbose: bool,
    /// Whether to emit machine-readable JSON output.
    pub json: bool,
    /// Simulated latency band for offline processing.
    pub offline_delay: ProcessingDelay,
    /// Per-provider endpoint overrides to publish into the registry.
    pub endpoint_overrides: Vec<(Provider, String)>,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub timeout: ConfigSource,
    pub no_color: ConfigSource,
    pub verbose: ConfigSource,
    pub json: ConfigSource,
    pub offline_delay: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and
    /// config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid, or any
    /// resolved value fails validation.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = Self::load_config()?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let timeout = Self::resolve_timeout(cli, &config, &mut sources.timeout);
        let no_color = Self::resolve_no_color(cli, &config, &mut sources.no_color);
        let verbose = Self::resolve_verbose(cli, &mut sources.verbose);
        let json = Self::resolve_json(cli, &mut sources.json);
        let offline_delay = Self::resolve_offline_delay(&config, &mut sources.offline_delay);
        let endpoint_overrides = config.endpoint_overrides()?;

        Ok(Self {
            timeout,
            no_color,
            verbose,
            json,
            offline_delay,
            endpoint_overrides,
            sources,
        })
    }

    /// Load config file, respecting the INKWRIGHT_CONFIG override.
    fn load_config() -> Result<Config> {
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            Config::load_from(Path::new(&path))
        } else {
            Config::load()
        }
    }

    fn resolve_timeout(cli: &Cli, config: &Config, source: &mut ConfigSource) -> Duration {
        // 1. CLI --timeout flag
        if let Some(timeout) = cli.timeout {
            *source = ConfigSource::Cli;
            return Duration::from_secs(timeout);
        }

        // 2. Environment variable
        if let Ok(timeout_env) = std::env::var(ENV_TIMEOUT) {
            if let Ok(timeout) = timeout_env.parse::<u64>() {
                *source = ConfigSource::Env;
                return Duration::from_secs(timeout);
            }
        }

        // 3. Config file
        *source = ConfigSource::ConfigFile;
        Duration::from_secs(config.general.timeout_seconds)
    }

    fn resolve_no_color(cli: &Cli, config: &Config, source: &mut ConfigSource) -> bool {
        // 1. CLI --no-color flag
        if cli.no_color {
            *source = ConfigSource::Cli;
            return true;
        }

        // 2. Environment variable (INKWRIGHT_NO_COLOR or standard NO_COLOR)
        if Self::is_env_truthy(ENV_NO_COLOR) || std::env::var(ENV_NO_COLOR_STD).is_ok() {
            *source = ConfigSource::Env;
            return true;
        }

        // 3. Config file (inverted: output.color = false means no_color = true)
        if !config.output.color {
            *source = ConfigSource::ConfigFile;
            return true;
        }

        // 4. Default
        *source = ConfigSource::Default;
        false
    }

    fn resolve_verbose(cli: &Cli, source: &mut ConfigSource) -> bool {
        if cli.verbose {
            *source = ConfigSource::Cli;
            return true;
        }
        if Self::is_env_truthy(ENV_VERBOSE) {
            *source = ConfigSource::Env;
            return true;
        }
        *source = ConfigSource::Default;
        false
    }

    fn resolve_json(cli: &Cli, source: &mut ConfigSource) -> bool {
        if cli.json {
            *source = ConfigSource::Cli;
            return true;
        }
        if Self::is_env_truthy(ENV_JSON) {
            *source = ConfigSource::Env;
            return true;
        }
        *source = ConfigSource::Default;
        false
    }

    fn resolve_offline_delay(config: &Config, source: &mut ConfigSource) -> ProcessingDelay {
        let defaults = OfflineConfig::default();
        if config.offline.delay_min_ms == defaults.delay_min_ms
            && config.offline.delay_max_ms == defaults.delay_max_ms
        {
            *source = ConfigSource::Default;
        } else {
            *source = ConfigSource::ConfigFile;
        }
        ProcessingDelay::bounded(
            Duration::from_millis(config.offline.delay_min_ms),
            Duration::from_millis(config.offline.delay_max_ms),
        )
    }

    /// Check if an environment variable is set to a truthy value.
    fn is_env_truthy(var: &str) -> bool {
        std::env::var(var)
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false)
    }
}

/// Log level from the config file's `[general] log_level` entry, if set.
///
/// Read before logging is initialized, so load failures yield `None` here;
/// [`ResolvedConfig::resolve`] reports them right afterwards.
#[must_use]
pub fn file_log_level() -> Option<LogLevel> {
    ResolvedConfig::load_config()
        .ok()?
        .general
        .log_level
        .as_deref()
        .and_then(LogLevel::from_arg)
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Offline processor settings.
    pub offline: OfflineConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Per-provider overrides, keyed by CLI provider name.
    pub providers: HashMap<String, ProviderOverride>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default timeout for network requests in seconds.
    pub timeout_seconds: u64,
    /// Default log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
}

/// Offline processor tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Lower bound of the simulated delay in milliseconds.
    pub delay_min_ms: u64,
    /// Upper bound of the simulated delay in milliseconds.
    pub delay_max_ms: u64,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub color: bool,
}

/// Overrides for a specific provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOverride {
    /// Replacement endpoint URL. This is how the custom provider gets its
    /// endpoint at all.
    pub endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            offline: OfflineConfig::default(),
            output: OutputConfig::default(),
            providers: HashMap::new(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            log_level: None,
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: 1_000,
            delay_max_ms: 3_000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let paths = AppPaths::new();
        Self::load_from(&paths.config_file())
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| InkwrightError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            InkwrightError::Config(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(path, content)?;
        tracing::debug!(?path, "Config file saved");
        Ok(())
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_path() -> std::path::PathBuf {
        AppPaths::new().config_file()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.general.timeout_seconds == 0 || self.general.timeout_seconds > 300 {
            return Err(InkwrightError::ConfigInvalid {
                key: "general.timeout_seconds".to_string(),
                value: self.general.timeout_seconds.to_string(),
                message: "must be between 1 and 300".to_string(),
            });
        }

        if self.offline.delay_min_ms > self.offline.delay_max_ms {
            return Err(InkwrightError::ConfigInvalid {
                key: "offline.delay_min_ms".to_string(),
                value: self.offline.delay_min_ms.to_string(),
                message: "must not exceed offline.delay_max_ms".to_string(),
            });
        }
        if self.offline.delay_max_ms > 10_000 {
            return Err(InkwrightError::ConfigInvalid {
                key: "offline.delay_max_ms".to_string(),
                value: self.offline.delay_max_ms.to_string(),
                message: "must be at most 10000".to_string(),
            });
        }

        for (name, overrides) in &self.providers {
            Provider::from_cli_name(name).map_err(|_| {
                let valid = Provider::ALL
                    .iter()
                    .map(|p| p.cli_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                InkwrightError::ConfigInvalid {
                    key: format!("providers.{name}"),
                    value: name.clone(),
                    message: format!("unknown provider; valid providers: {valid}"),
                }
            })?;
            if let Some(endpoint) = &overrides.endpoint {
                if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                    return Err(InkwrightError::ConfigInvalid {
                        key: format!("providers.{name}.endpoint"),
                        value: endpoint.clone(),
                        message: "must start with http:// or https://".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Endpoint overrides as registry-ready pairs.
    pub fn endpoint_overrides(&self) -> Result<Vec<(Provider, String)>> {
        let mut overrides = Vec::new();
        for (name, entry) in &self.providers {
            let provider = Provider::from_cli_name(name)?;
            if let Some(endpoint) = &entry.endpoint {
                overrides.push((provider, endpoint.clone()));
            }
        }
        overrides.sort_by_key(|(provider, _)| provider.cli_name());
        Ok(overrides)
    }
}

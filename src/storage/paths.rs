//! Application paths for config, cache, and data.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that relocates every application directory, used by
/// tests and sandboxed installs.
pub const ENV_HOME: &str = "INKWRIGHT_HOME";

/// Application paths.
pub struct AppPaths {
    /// Configuration directory.
    pub config: PathBuf,
    /// Cache directory.
    pub cache: PathBuf,
    /// Data directory.
    pub data: PathBuf,
}

impl AppPaths {
    /// Create paths for the inkwright application.
    #[must_use]
    pub fn new() -> Self {
        if let Ok(root) = std::env::var(ENV_HOME) {
            return Self::under_root(PathBuf::from(root));
        }
        if let Some(proj_dirs) = ProjectDirs::from("com", "inkwright", "inkwright") {
            Self {
                config: proj_dirs.config_dir().to_path_buf(),
                cache: proj_dirs.cache_dir().to_path_buf(),
                data: proj_dirs.data_dir().to_path_buf(),
            }
        } else {
            // Fallback to home directory
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            Self {
                config: home.join(".config/inkwright"),
                cache: home.join(".cache/inkwright"),
                data: home.join(".local/share/inkwright"),
            }
        }
    }

    /// All paths rooted under a single directory.
    #[must_use]
    pub fn under_root(root: PathBuf) -> Self {
        Self {
            config: root.join("config"),
            cache: root.join("cache"),
            data: root.join("data"),
        }
    }

    /// Path to the config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }

    /// Path to the persisted API key map.
    #[must_use]
    pub fn api_keys_file(&self) -> PathBuf {
        self.data.join("ai-api-keys.json")
    }

    /// Path to the persisted provider selection.
    #[must_use]
    pub fn selected_provider_file(&self) -> PathBuf {
        self.data.join("ai-selected-provider.json")
    }

    /// Path to the persisted model selection.
    #[must_use]
    pub fn selected_model_file(&self) -> PathBuf {
        self.data.join("ai-selected-model.json")
    }

    /// Path to the persisted processing settings blob.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.data.join("ai-settings.json")
    }

    /// Ensure all directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.cache)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Home directory lookup backed by `directories`.
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
    }
}

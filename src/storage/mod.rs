//! Storage for configuration, credentials, and processing settings.

pub mod config;
pub mod credentials;
pub mod paths;
pub mod settings;

pub use config::{
    Config, ConfigSource, ConfigSources, ResolvedConfig, file_log_level,
    ENV_CONFIG, ENV_JSON, ENV_NO_COLOR, ENV_NO_COLOR_STD,
    ENV_TIMEOUT, ENV_VERBOSE,
};
pub use credentials::{CredentialStore, Selection, key_format_warning};
pub use paths::AppPaths;
pub use settings::ProcessingSettings;

//! Error types for inkwright.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into seven main categories:
//! - **Validation**: Input text or provider/model names rejected before dispatch
//! - **Credentials**: Missing or malformed API keys
//! - **Network**: Timeout, connection, or transport issues
//! - **Provider**: Upstream API errors and unusable response bodies
//! - **Configuration**: Config file parsing, validation, or missing values
//! - **Storage**: Persisted key/selection/settings files unreadable or unwritable
//! - **Internal**: Unexpected errors, bugs, or unclassified issues
//!
//! Each error has a stable error code (e.g., `INKW-A001`) for programmatic
//! handling.
//!
//! ## Propagation policy
//!
//! Only `Validation` and `Credentials` errors may reach a caller of
//! [`crate::core::orchestrator::Orchestrator::process_text`]; `Provider` and
//! `Network` errors are absorbed by the offline fallback and exist here for
//! the dispatcher's internal reporting and for structured logging of the
//! downgrade.
//!
//! ## Fix Suggestions
//!
//! Each error type can provide actionable fix suggestions via the
//! [`InkwrightError::fix_suggestions()`] method. Suggestions include:
//! - Commands to run (copy-paste ready)
//! - Context explaining why the error occurred
//! - Prevention tips for the future
//! - Documentation links when available

pub mod suggestions;

use thiserror::Error;

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
///
/// Used to determine fix suggestions and error handling strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Validation issues (rejected input text, unknown provider/model names).
    Validation,
    /// Credential issues (missing or malformed API keys).
    Credentials,
    /// Network issues (timeout, connection refused, transport failures).
    Network,
    /// Provider-specific issues (upstream API errors, unusable responses).
    Provider,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// Storage issues (persisted state files unreadable/unwritable).
    Storage,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Validation error",
            Self::Credentials => "Credential error",
            Self::Network => "Network error",
            Self::Provider => "Provider error",
            Self::Configuration => "Configuration error",
            Self::Storage => "Storage error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Validation => "V",
            Self::Credentials => "A",
            Self::Network => "N",
            Self::Provider => "P",
            Self::Configuration => "C",
            Self::Storage => "S",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for the CLI binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Bad input text or unknown provider/model name
    UsageError = 2,
    /// Missing credential or invalid configuration
    ConfigError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Main error type for inkwright operations.
///
/// Each variant has:
/// - A stable error code (e.g., `INKW-A001`)
/// - A category for classification
/// - A retryable flag for retry logic
#[derive(Error, Debug)]
pub enum InkwrightError {
    // ==========================================================================
    // Validation errors (Category: Validation)
    // ==========================================================================
    /// Input text rejected before any provider was contacted.
    #[error("invalid input: {reason}")]
    InvalidInput {
        reason: String,
    },

    /// Provider name not present in the registry.
    #[error("unknown provider: {name}")]
    UnknownProvider {
        name: String,
    },

    /// Model name not offered by the selected provider.
    #[error("model '{model}' is not offered by {provider}")]
    UnknownModel {
        provider: String,
        model: String,
    },

    // ==========================================================================
    // Credential errors (Category: Credentials)
    // ==========================================================================
    /// Provider requires an API key and none is configured.
    #[error("no API key configured for {provider}")]
    MissingCredential {
        provider: String,
    },

    // ==========================================================================
    // Network errors (Category: Network)
    // ==========================================================================
    /// Request timed out after the configured deadline.
    #[error("request to {provider} timed out after {seconds}s")]
    Timeout {
        provider: String,
        seconds: u64,
    },

    /// Generic transport failure (connection refused, DNS, TLS).
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Provider errors (Category: Provider)
    // ==========================================================================
    /// Live provider returned a non-2xx status.
    #[error("upstream error from {provider}: {detail}")]
    Upstream {
        provider: String,
        detail: String,
    },

    /// A 2xx response whose body could not be normalized into text.
    #[error("unusable response from {provider}: {detail}")]
    MalformedResponse {
        provider: String,
        detail: String,
    },

    /// Dispatch was attempted against a provider with no endpoint configured.
    #[error("no endpoint configured for {provider}")]
    NoEndpoint {
        provider: String,
    },

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Error parsing the TOML configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse {
        path: String,
        message: String,
    },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Storage errors (Category: Storage)
    // ==========================================================================
    /// Persisted state file could not be read or written.
    #[error("storage error at {path}: {detail}")]
    Storage {
        path: String,
        detail: String,
    },

    // ==========================================================================
    // I/O errors (Category: Internal)
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InkwrightError {
    /// Map error to an exit code for the CLI binary.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            // Bad names or bad text -> usage error
            Self::InvalidInput { .. }
            | Self::UnknownProvider { .. }
            | Self::UnknownModel { .. } => ExitCode::UsageError,

            // Credential and configuration problems -> config error
            Self::MissingCredential { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_)
            | Self::NoEndpoint { .. } => ExitCode::ConfigError,

            // Timeout gets its own code for scripting
            Self::Timeout { .. } => ExitCode::Timeout,

            // Everything else -> general error
            Self::Network(_)
            | Self::Upstream { .. }
            | Self::MalformedResponse { .. }
            | Self::Storage { .. }
            | Self::Io(_)
            | Self::Json(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::UnknownProvider { .. }
            | Self::UnknownModel { .. } => ErrorCategory::Validation,

            Self::MissingCredential { .. } => ErrorCategory::Credentials,

            Self::Timeout { .. } | Self::Network(_) => ErrorCategory::Network,

            Self::Upstream { .. }
            | Self::MalformedResponse { .. }
            | Self::NoEndpoint { .. } => ErrorCategory::Provider,

            Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_) => ErrorCategory::Configuration,

            Self::Storage { .. } => ErrorCategory::Storage,

            Self::Io(_) | Self::Json(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `INKW-{category}{number}` where category is:
    /// - V: Validation
    /// - A: Credentials
    /// - N: Network
    /// - P: Provider
    /// - C: Configuration
    /// - S: Storage
    /// - X: Internal
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            // Validation errors (V001-V099)
            Self::InvalidInput { .. } => "INKW-V001",
            Self::UnknownProvider { .. } => "INKW-V010",
            Self::UnknownModel { .. } => "INKW-V011",

            // Credential errors (A001-A099)
            Self::MissingCredential { .. } => "INKW-A001",

            // Network errors (N001-N099)
            Self::Timeout { .. } => "INKW-N001",
            Self::Network(_) => "INKW-N002",

            // Provider errors (P001-P099)
            Self::Upstream { .. } => "INKW-P001",
            Self::MalformedResponse { .. } => "INKW-P002",
            Self::NoEndpoint { .. } => "INKW-P003",

            // Configuration errors (C001-C099)
            Self::ConfigParse { .. } => "INKW-C001",
            Self::ConfigInvalid { .. } => "INKW-C002",
            Self::Config(_) => "INKW-C003",

            // Storage errors (S001-S099)
            Self::Storage { .. } => "INKW-S001",

            // Internal errors (X001-X099)
            Self::Io(_) => "INKW-X001",
            Self::Json(_) => "INKW-X002",
        }
    }

    /// Returns whether the error is potentially recoverable by retrying.
    ///
    /// Retryable errors include timeouts, transient network failures, and
    /// upstream provider errors (which the orchestrator absorbs into the
    /// offline fallback rather than retrying automatically).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Network(_) | Self::Upstream { .. }
        )
    }

    /// Returns the provider name if this error is provider-specific.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::MissingCredential { provider }
            | Self::Timeout { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::NoEndpoint { provider }
            | Self::UnknownModel { provider, .. } => Some(provider),
            Self::UnknownProvider { name } => Some(name),
            _ => None,
        }
    }

    /// Returns whether this error is absorbed by the offline fallback rather
    /// than surfaced to the caller of `process_text`.
    #[must_use]
    pub const fn is_absorbed_by_fallback(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Network(_)
                | Self::Upstream { .. }
                | Self::MalformedResponse { .. }
                | Self::NoEndpoint { .. }
        )
    }

    /// Returns actionable fix suggestions for this error.
    ///
    /// Suggestions include commands to run, context about why the error
    /// occurred, prevention tips, and documentation links when available.
    ///
    /// # Example
    ///
    /// ```
    /// use inkwright::error::InkwrightError;
    ///
    /// let err = InkwrightError::MissingCredential { provider: "openai".to_string() };
    /// let suggestions = err.fix_suggestions();
    ///
    /// if !suggestions.is_empty() {
    ///     println!("Try these commands:");
    ///     for cmd in &suggestions[0].commands {
    ///         println!("  {}", cmd);
    ///     }
    /// }
    /// ```
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::InvalidInput { reason } => suggestions::invalid_input_suggestions(reason),
            Self::UnknownProvider { name } => suggestions::unknown_provider_suggestions(name),
            Self::UnknownModel { provider, model } => {
                suggestions::unknown_model_suggestions(provider, model)
            }

            Self::MissingCredential { provider } => {
                suggestions::missing_credential_suggestions(provider)
            }

            Self::Timeout { provider, seconds } => {
                suggestions::timeout_suggestions(provider, *seconds)
            }
            Self::Network(detail) => suggestions::network_suggestions(detail),

            Self::Upstream { provider, detail } => {
                suggestions::upstream_suggestions(provider, detail)
            }
            Self::MalformedResponse { provider, detail } => {
                suggestions::malformed_response_suggestions(provider, detail)
            }
            Self::NoEndpoint { provider } => suggestions::no_endpoint_suggestions(provider),

            Self::ConfigParse { path, message } => {
                suggestions::config_parse_suggestions(path, message)
            }
            Self::ConfigInvalid { key, value, message } => {
                suggestions::config_invalid_suggestions(key, value, message)
            }
            Self::Config(msg) => {
                vec![FixSuggestion::new(
                    vec!["inkwright config show".to_string()],
                    format!("Configuration error: {}", msg),
                )]
            }

            Self::Storage { path, detail } => suggestions::storage_suggestions(path, detail),

            Self::Io(err) => {
                vec![FixSuggestion::new(
                    vec!["# Check file permissions and disk space".to_string()],
                    format!(
                        "I/O error: {}. Check file permissions and available disk space.",
                        err
                    ),
                )]
            }
            Self::Json(err) => {
                vec![FixSuggestion::new(
                    vec!["inkwright config show".to_string()],
                    format!(
                        "JSON parsing error: {}. A persisted state file may be corrupted.",
                        err
                    ),
                )]
            }
        }
    }
}

/// Result type alias for inkwright operations.
pub type Result<T> = std::result::Result<T, InkwrightError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // ErrorCategory tests
    // -------------------------------------------------------------------------

    #[test]
    fn error_category_description() {
        assert_eq!(ErrorCategory::Validation.description(), "Validation error");
        assert_eq!(ErrorCategory::Credentials.description(), "Credential error");
        assert_eq!(ErrorCategory::Network.description(), "Network error");
        assert_eq!(ErrorCategory::Provider.description(), "Provider error");
        assert_eq!(ErrorCategory::Configuration.description(), "Configuration error");
        assert_eq!(ErrorCategory::Storage.description(), "Storage error");
        assert_eq!(ErrorCategory::Internal.description(), "Internal error");
    }

    #[test]
    fn error_category_code_prefix() {
        assert_eq!(ErrorCategory::Validation.code_prefix(), "V");
        assert_eq!(ErrorCategory::Credentials.code_prefix(), "A");
        assert_eq!(ErrorCategory::Network.code_prefix(), "N");
        assert_eq!(ErrorCategory::Provider.code_prefix(), "P");
        assert_eq!(ErrorCategory::Configuration.code_prefix(), "C");
        assert_eq!(ErrorCategory::Storage.code_prefix(), "S");
        assert_eq!(ErrorCategory::Internal.code_prefix(), "X");
    }

    #[test]
    fn error_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Validation), "Validation error");
        assert_eq!(format!("{}", ErrorCategory::Network), "Network error");
    }

    // -------------------------------------------------------------------------
    // InkwrightError category tests
    // -------------------------------------------------------------------------

    #[test]
    fn validation_errors_have_correct_category() {
        let err = InkwrightError::InvalidInput { reason: "too short".to_string() };
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = InkwrightError::UnknownProvider { name: "frobnicator".to_string() };
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err = InkwrightError::UnknownModel {
            provider: "groq".to_string(),
            model: "gpt-4".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn credential_errors_have_correct_category() {
        let err = InkwrightError::MissingCredential { provider: "openai".to_string() };
        assert_eq!(err.category(), ErrorCategory::Credentials);
    }

    #[test]
    fn network_errors_have_correct_category() {
        let err = InkwrightError::Timeout { provider: "openai".to_string(), seconds: 30 };
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = InkwrightError::Network("connection reset".to_string());
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn provider_errors_have_correct_category() {
        let err = InkwrightError::Upstream {
            provider: "claude".to_string(),
            detail: "HTTP 500".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Provider);

        let err = InkwrightError::MalformedResponse {
            provider: "gemini".to_string(),
            detail: "no candidates".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Provider);

        let err = InkwrightError::NoEndpoint { provider: "custom".to_string() };
        assert_eq!(err.category(), ErrorCategory::Provider);
    }

    #[test]
    fn configuration_errors_have_correct_category() {
        let err = InkwrightError::Config("invalid setting".to_string());
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = InkwrightError::ConfigParse {
            path: "/etc/inkwright/config.toml".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn storage_errors_have_correct_category() {
        let err = InkwrightError::Storage {
            path: "/tmp/ai-api-keys.json".to_string(),
            detail: "permission denied".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn internal_errors_have_correct_category() {
        let err = InkwrightError::Json(serde_json::from_str::<()>("invalid").unwrap_err());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    // -------------------------------------------------------------------------
    // Error code tests
    // -------------------------------------------------------------------------

    #[test]
    fn error_codes_follow_format() {
        // All error codes should start with "INKW-"
        let errors: Vec<InkwrightError> = vec![
            InkwrightError::InvalidInput { reason: "test".to_string() },
            InkwrightError::MissingCredential { provider: "test".to_string() },
            InkwrightError::Timeout { provider: "test".to_string(), seconds: 30 },
            InkwrightError::Upstream {
                provider: "test".to_string(),
                detail: "test".to_string(),
            },
            InkwrightError::Config("test".to_string()),
        ];

        for err in errors {
            let code = err.error_code();
            assert!(code.starts_with("INKW-"), "Error code {} should start with INKW-", code);
            assert!(code.len() >= 9, "Error code {} should be at least 9 chars", code);
        }
    }

    #[test]
    fn error_codes_are_unique() {
        use std::collections::HashSet;

        let codes: Vec<&str> = vec![
            InkwrightError::InvalidInput { reason: String::new() }.error_code(),
            InkwrightError::UnknownProvider { name: String::new() }.error_code(),
            InkwrightError::UnknownModel { provider: String::new(), model: String::new() }.error_code(),
            InkwrightError::MissingCredential { provider: String::new() }.error_code(),
            InkwrightError::Timeout { provider: String::new(), seconds: 0 }.error_code(),
            InkwrightError::Network(String::new()).error_code(),
            InkwrightError::Upstream { provider: String::new(), detail: String::new() }.error_code(),
            InkwrightError::MalformedResponse { provider: String::new(), detail: String::new() }.error_code(),
            InkwrightError::NoEndpoint { provider: String::new() }.error_code(),
            InkwrightError::ConfigParse { path: String::new(), message: String::new() }.error_code(),
            InkwrightError::ConfigInvalid {
                key: String::new(),
                value: String::new(),
                message: String::new(),
            }
            .error_code(),
            InkwrightError::Config(String::new()).error_code(),
            InkwrightError::Storage { path: String::new(), detail: String::new() }.error_code(),
        ];

        let unique: HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes should be unique");
    }

    #[test]
    fn error_code_prefix_matches_category() {
        let errors: Vec<InkwrightError> = vec![
            InkwrightError::InvalidInput { reason: String::new() },
            InkwrightError::MissingCredential { provider: String::new() },
            InkwrightError::Timeout { provider: String::new(), seconds: 0 },
            InkwrightError::Upstream { provider: String::new(), detail: String::new() },
            InkwrightError::Config(String::new()),
            InkwrightError::Storage { path: String::new(), detail: String::new() },
        ];

        for err in errors {
            let code = err.error_code();
            let prefix = err.category().code_prefix();
            assert!(
                code["INKW-".len()..].starts_with(prefix),
                "Code {} should carry category prefix {}",
                code,
                prefix
            );
        }
    }

    // -------------------------------------------------------------------------
    // Retryable tests
    // -------------------------------------------------------------------------

    #[test]
    fn retryable_errors() {
        assert!(InkwrightError::Timeout { provider: "test".to_string(), seconds: 30 }.is_retryable());
        assert!(InkwrightError::Network("reset".to_string()).is_retryable());
        assert!(InkwrightError::Upstream {
            provider: "test".to_string(),
            detail: "HTTP 503".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn non_retryable_errors() {
        assert!(!InkwrightError::InvalidInput { reason: "empty".to_string() }.is_retryable());
        assert!(!InkwrightError::MissingCredential { provider: "test".to_string() }.is_retryable());
        assert!(!InkwrightError::Config("test".to_string()).is_retryable());
        assert!(!InkwrightError::MalformedResponse {
            provider: "test".to_string(),
            detail: "empty body".to_string(),
        }
        .is_retryable());
    }

    // -------------------------------------------------------------------------
    // Fallback absorption tests
    // -------------------------------------------------------------------------

    #[test]
    fn transport_and_upstream_errors_are_absorbed() {
        assert!(InkwrightError::Timeout { provider: "x".to_string(), seconds: 30 }
            .is_absorbed_by_fallback());
        assert!(InkwrightError::Network("down".to_string()).is_absorbed_by_fallback());
        assert!(InkwrightError::Upstream {
            provider: "x".to_string(),
            detail: "HTTP 500".to_string(),
        }
        .is_absorbed_by_fallback());
        assert!(InkwrightError::MalformedResponse {
            provider: "x".to_string(),
            detail: "not json".to_string(),
        }
        .is_absorbed_by_fallback());
        assert!(InkwrightError::NoEndpoint { provider: "custom".to_string() }
            .is_absorbed_by_fallback());
    }

    #[test]
    fn validation_and_credential_errors_are_not_absorbed() {
        assert!(!InkwrightError::InvalidInput { reason: "empty".to_string() }
            .is_absorbed_by_fallback());
        assert!(!InkwrightError::MissingCredential { provider: "openai".to_string() }
            .is_absorbed_by_fallback());
        assert!(!InkwrightError::UnknownProvider { name: "nope".to_string() }
            .is_absorbed_by_fallback());
    }

    // -------------------------------------------------------------------------
    // Provider extraction tests
    // -------------------------------------------------------------------------

    #[test]
    fn provider_extraction() {
        let err = InkwrightError::MissingCredential { provider: "openai".to_string() };
        assert_eq!(err.provider(), Some("openai"));

        let err = InkwrightError::Upstream {
            provider: "claude".to_string(),
            detail: "test".to_string(),
        };
        assert_eq!(err.provider(), Some("claude"));

        let err = InkwrightError::UnknownProvider { name: "gemini".to_string() };
        assert_eq!(err.provider(), Some("gemini"));
    }

    #[test]
    fn provider_returns_none_for_non_provider_errors() {
        let err = InkwrightError::Network("test".to_string());
        assert_eq!(err.provider(), None);

        let err = InkwrightError::Config("test".to_string());
        assert_eq!(err.provider(), None);
    }

    // -------------------------------------------------------------------------
    // Exit code tests
    // -------------------------------------------------------------------------

    #[test]
    fn exit_codes_are_correct() {
        assert_eq!(
            InkwrightError::InvalidInput { reason: "empty".to_string() }.exit_code(),
            ExitCode::UsageError
        );
        assert_eq!(
            InkwrightError::UnknownProvider { name: "x".to_string() }.exit_code(),
            ExitCode::UsageError
        );

        assert_eq!(
            InkwrightError::MissingCredential { provider: "openai".to_string() }.exit_code(),
            ExitCode::ConfigError
        );
        assert_eq!(
            InkwrightError::Config("test".to_string()).exit_code(),
            ExitCode::ConfigError
        );

        assert_eq!(
            InkwrightError::Timeout { provider: "test".to_string(), seconds: 30 }.exit_code(),
            ExitCode::Timeout
        );

        assert_eq!(
            InkwrightError::Network("test".to_string()).exit_code(),
            ExitCode::GeneralError
        );
    }

    // -------------------------------------------------------------------------
    // Fix suggestion tests
    // -------------------------------------------------------------------------

    #[test]
    fn all_error_variants_have_suggestions() {
        // Every error should have at least one suggestion
        let errors: Vec<InkwrightError> = vec![
            InkwrightError::InvalidInput { reason: "too short".to_string() },
            InkwrightError::UnknownProvider { name: "frobnicator".to_string() },
            InkwrightError::UnknownModel {
                provider: "groq".to_string(),
                model: "gpt-4".to_string(),
            },
            InkwrightError::MissingCredential { provider: "openai".to_string() },
            InkwrightError::Timeout { provider: "claude".to_string(), seconds: 30 },
            InkwrightError::Network("reset".to_string()),
            InkwrightError::Upstream {
                provider: "gemini".to_string(),
                detail: "HTTP 500".to_string(),
            },
            InkwrightError::MalformedResponse {
                provider: "ollama".to_string(),
                detail: "no message".to_string(),
            },
            InkwrightError::NoEndpoint { provider: "custom".to_string() },
            InkwrightError::ConfigParse {
                path: "config.toml".to_string(),
                message: "syntax error".to_string(),
            },
            InkwrightError::ConfigInvalid {
                key: "timeout".to_string(),
                value: "abc".to_string(),
                message: "must be a number".to_string(),
            },
            InkwrightError::Config("invalid".to_string()),
            InkwrightError::Storage {
                path: "/tmp/keys.json".to_string(),
                detail: "permission denied".to_string(),
            },
        ];

        for err in errors {
            let suggestions = err.fix_suggestions();
            assert!(
                !suggestions.is_empty(),
                "Error {:?} should have at least one suggestion",
                err
            );
            assert!(
                !suggestions[0].context.is_empty(),
                "Error {:?} suggestion should have context",
                err
            );
        }
    }

    #[test]
    fn suggestions_include_provider_in_commands() {
        let err = InkwrightError::MissingCredential { provider: "openai".to_string() };
        let suggestions = err.fix_suggestions();

        assert!(!suggestions.is_empty());
        // At least one command should mention the provider
        let has_provider_cmd = suggestions[0].commands.iter().any(|c| c.contains("openai"));
        assert!(has_provider_cmd, "Suggestions should include provider-specific commands");
    }

    #[test]
    fn missing_credential_has_console_link() {
        let err = InkwrightError::MissingCredential { provider: "claude".to_string() };
        let suggestions = err.fix_suggestions();

        assert!(!suggestions.is_empty());
        assert!(
            suggestions[0].doc_url.is_some(),
            "MissingCredential for a known provider should link to its key console"
        );
    }

    #[test]
    fn timeout_includes_duration() {
        let err = InkwrightError::Timeout { provider: "groq".to_string(), seconds: 45 };
        let suggestions = err.fix_suggestions();

        assert!(!suggestions.is_empty());
        assert!(
            suggestions[0].context.contains("45"),
            "Timeout suggestion should mention duration"
        );
    }

    #[test]
    fn missing_credential_has_prevention_tip() {
        let err = InkwrightError::MissingCredential { provider: "openai".to_string() };
        let suggestions = err.fix_suggestions();

        assert!(!suggestions.is_empty());
        assert!(
            suggestions[0].prevention.is_some(),
            "MissingCredential should carry a prevention tip"
        );
    }
}

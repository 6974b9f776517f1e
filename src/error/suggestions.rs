//! Fix suggestion database for inkwright errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands, context explanations, and prevention tips.

use crate::core::provider::Provider;

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
///
/// Contains actionable information to help users resolve errors.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Primary fix commands in order of preference.
    /// These should be copy-paste ready for the terminal.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    /// Should help users understand the root cause.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,

    /// Link to documentation for more information.
    pub doc_url: Option<String>,

    /// Whether this can potentially be auto-fixed.
    pub auto_fixable: bool,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
            doc_url: None,
            auto_fixable: false,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }

    /// Builder: adds documentation URL.
    #[must_use]
    pub fn with_doc_url(mut self, url: impl Into<String>) -> Self {
        self.doc_url = Some(url.into());
        self
    }

    /// Builder: marks as auto-fixable.
    #[must_use]
    pub const fn auto_fixable(mut self) -> Self {
        self.auto_fixable = true;
        self
    }
}

// =============================================================================
// API Key Helpers
// =============================================================================

/// Normalizes a provider reference to its CLI name.
///
/// Errors carry display names ("Google Gemini"); embedded commands need the
/// name the user actually types ("gemini").
#[must_use]
pub fn provider_cli_name(provider: &str) -> String {
    Provider::ALL
        .iter()
        .find(|p| {
            p.display_name().eq_ignore_ascii_case(provider)
                || p.cli_name().eq_ignore_ascii_case(provider)
        })
        .map_or_else(|| provider.to_lowercase(), |p| p.cli_name().to_string())
}

/// Returns the commands to configure a key (or daemon) for a provider.
#[must_use]
pub fn key_setup_commands_for(provider: &str) -> Vec<String> {
    let name = provider_cli_name(provider);
    match name.as_str() {
        "ollama" => vec![
            "ollama serve".to_string(),
            "# Pull a model first: ollama pull llama3.2".to_string(),
        ],
        "lmstudio" => vec![
            "# Start the LM Studio local server (Developer tab)".to_string(),
            "inkwright probe lmstudio".to_string(),
        ],
        "custom" => vec![
            "inkwright key set custom".to_string(),
            "# Set the endpoint URL in config.toml under [providers.custom]".to_string(),
        ],
        _ => vec![
            format!("inkwright key set {}", name),
            format!("inkwright probe {}", name),
        ],
    }
}

/// Returns the key-management console URL for a provider, when known.
#[must_use]
pub fn key_doc_for(provider: &str) -> Option<String> {
    match provider_cli_name(provider).as_str() {
        "openai" => Some("https://platform.openai.com/api-keys".to_string()),
        "claude" => Some("https://console.anthropic.com/settings/keys".to_string()),
        "gemini" => Some("https://aistudio.google.com/app/apikey".to_string()),
        "groq" => Some("https://console.groq.com/keys".to_string()),
        "openrouter" => Some("https://openrouter.ai/keys".to_string()),
        "mistral" => Some("https://console.mistral.ai/api-keys".to_string()),
        "deepseek" => Some("https://platform.deepseek.com/api_keys".to_string()),
        "together" => Some("https://api.together.ai/settings/api-keys".to_string()),
        "perplexity" => Some("https://www.perplexity.ai/settings/api".to_string()),
        "cohere" => Some("https://dashboard.cohere.com/api-keys".to_string()),
        "ollama" => Some("https://ollama.com/download".to_string()),
        "lmstudio" => Some("https://lmstudio.ai".to_string()),
        _ => None,
    }
}

// =============================================================================
// Suggestion Generators
// =============================================================================

/// Generates fix suggestions for invalid input errors.
#[must_use]
pub fn invalid_input_suggestions(reason: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["inkwright process --help".to_string()],
        format!(
            "The input text was rejected before any provider was contacted: {}. \
             Text must be non-empty, at least 3 characters, at most 10000 \
             characters, and free of script markup.",
            reason
        ),
    )]
}

/// Generates fix suggestions for missing credential errors.
#[must_use]
pub fn missing_credential_suggestions(provider: &str) -> Vec<FixSuggestion> {
    let mut suggestion = FixSuggestion::new(
        key_setup_commands_for(provider),
        format!(
            "No API key is configured for {}. This provider requires a key \
             before any request can be dispatched; without one, only the \
             offline processor is available.",
            provider
        ),
    );
    if let Some(url) = key_doc_for(provider) {
        suggestion = suggestion.with_doc_url(url);
    }
    vec![
        suggestion.with_prevention(
            "Run `inkwright probe <provider>` after setting a key to confirm it \
             is accepted before relying on it.",
        ),
    ]
}

/// Generates fix suggestions for unknown provider errors.
#[must_use]
pub fn unknown_provider_suggestions(name: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![
            "inkwright providers".to_string(),
            "inkwright select provider <name>".to_string(),
        ],
        format!(
            "Unknown provider: '{}'. Use `inkwright providers` to see the \
             available catalog.",
            name
        ),
    )]
}

/// Generates fix suggestions for unknown model errors.
#[must_use]
pub fn unknown_model_suggestions(provider: &str, model: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![
            "inkwright providers".to_string(),
            format!("inkwright select provider {}", provider_cli_name(provider)),
        ],
        format!(
            "The model '{}' is not offered by {}. Selecting the provider again \
             resets the model to the first one it lists.",
            model, provider
        ),
    )]
}

/// Generates fix suggestions for timeout errors.
#[must_use]
pub fn timeout_suggestions(provider: &str, seconds: u64) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![
                format!("inkwright probe {}", provider_cli_name(provider)),
                "inkwright config show".to_string(),
            ],
            format!(
                "The {} provider did not respond within {}s. This could be due \
                 to network issues or provider slowness; the request fell back \
                 to the offline processor.",
                provider, seconds
            ),
        )
        .with_prevention(
            "Raise `timeout_seconds` under [general] in config.toml if the \
             provider is consistently slow but reachable.",
        ),
    ]
}

/// Generates fix suggestions for generic network errors.
#[must_use]
pub fn network_suggestions(detail: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["inkwright probe --all".to_string()],
        format!(
            "Network error: {}. Check your internet connection; for local \
             daemons, check that the server process is running.",
            detail
        ),
    )]
}

/// Generates fix suggestions for upstream provider errors.
#[must_use]
pub fn upstream_suggestions(provider: &str, detail: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("inkwright probe {}", provider_cli_name(provider))],
            format!(
                "The {} API returned an error: {}. Results continue to come \
                 from the offline processor until the provider recovers.",
                provider, detail
            ),
        )
        .with_prevention(
            "Check the provider's status page for known outages. A 401/403 \
             usually means the key was revoked or mistyped.",
        ),
    ]
}

/// Generates fix suggestions for malformed response errors.
#[must_use]
pub fn malformed_response_suggestions(provider: &str, detail: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("inkwright probe {}", provider_cli_name(provider))],
        format!(
            "A response from {} could not be normalized: {}. This may indicate \
             an API shape change or a proxy interfering with the body.",
            provider, detail
        ),
    )]
}

/// Generates fix suggestions for missing endpoint errors.
#[must_use]
pub fn no_endpoint_suggestions(provider: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![
            "inkwright config show".to_string(),
            format!(
                "# Set [providers.{}] endpoint = \"https://...\" in config.toml",
                provider_cli_name(provider)
            ),
        ],
        format!(
            "No endpoint is configured for {}. Requests to it cannot be \
             dispatched until an endpoint URL is set.",
            provider
        ),
    )]
}

/// Generates fix suggestions for config parse errors.
#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![
                format!("$EDITOR {}", path),
                "inkwright config init --force".to_string(),
            ],
            format!(
                "The config file has a syntax error. The TOML parser reported: {}",
                message
            ),
        )
        .with_prevention(
            "Run `inkwright config show` after editing to check the effective \
             values.",
        ),
    ]
}

/// Generates fix suggestions for invalid config value errors.
#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["inkwright config show".to_string()],
        format!(
            "Invalid config value for '{}': '{}'. {}",
            key, value, message
        ),
    )]
}

/// Generates fix suggestions for storage errors.
#[must_use]
pub fn storage_suggestions(path: &str, detail: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![
            format!("ls -la {}", path),
            "# Check file permissions and disk space".to_string(),
        ],
        format!(
            "Reading or writing {} failed: {}. Keys and selection are persisted \
             there; until the file is writable, changes will not survive a \
             restart.",
            path, detail
        ),
    )]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_suggestion_builder() {
        let suggestion = FixSuggestion::new(vec!["cmd1".to_string()], "Test context")
            .with_prevention("Prevent tip")
            .with_doc_url("https://example.com")
            .auto_fixable();

        assert_eq!(suggestion.commands, vec!["cmd1"]);
        assert_eq!(suggestion.context, "Test context");
        assert_eq!(suggestion.prevention, Some("Prevent tip".to_string()));
        assert_eq!(suggestion.doc_url, Some("https://example.com".to_string()));
        assert!(suggestion.auto_fixable);
    }

    #[test]
    fn key_setup_commands_for_cloud_providers() {
        let openai_cmds = key_setup_commands_for("openai");
        assert!(openai_cmds.iter().any(|c| c.contains("key set openai")));

        let groq_cmds = key_setup_commands_for("groq");
        assert!(groq_cmds.iter().any(|c| c.contains("key set groq")));
    }

    #[test]
    fn display_names_normalize_to_cli_names() {
        assert_eq!(provider_cli_name("Google Gemini"), "gemini");
        assert_eq!(provider_cli_name("LM Studio"), "lmstudio");
        assert_eq!(provider_cli_name("OpenAI"), "openai");
        assert_eq!(provider_cli_name("no-such-provider"), "no-such-provider");

        let cmds = key_setup_commands_for("Google Gemini");
        assert!(cmds.iter().any(|c| c.contains("key set gemini")));
    }

    #[test]
    fn key_setup_commands_for_local_daemons() {
        let ollama_cmds = key_setup_commands_for("ollama");
        assert!(ollama_cmds.iter().any(|c| c.contains("ollama serve")));

        let lmstudio_cmds = key_setup_commands_for("lmstudio");
        assert!(lmstudio_cmds.iter().any(|c| c.contains("probe lmstudio")));
    }

    #[test]
    fn key_docs_for_known_providers() {
        assert!(key_doc_for("openai").is_some());
        assert!(key_doc_for("claude").is_some());
        assert!(key_doc_for("gemini").is_some());
        assert!(key_doc_for("unknown_xyz").is_none());
    }

    #[test]
    fn missing_credential_suggestions_have_commands() {
        let suggestions = missing_credential_suggestions("openai");
        assert!(!suggestions.is_empty());
        assert!(!suggestions[0].commands.is_empty());
        assert!(suggestions[0].commands.iter().any(|c| c.contains("openai")));
        assert!(suggestions[0].doc_url.is_some());
    }

    #[test]
    fn timeout_suggestions_include_provider() {
        let suggestions = timeout_suggestions("groq", 30);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].context.contains("groq"));
        assert!(suggestions[0].context.contains("30"));
    }

    #[test]
    fn unknown_model_suggestions_name_both_parts() {
        let suggestions = unknown_model_suggestions("groq", "gpt-4");
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].context.contains("gpt-4"));
        assert!(suggestions[0].context.contains("groq"));
    }
}

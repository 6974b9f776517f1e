//! Provider identities and descriptors.
//!
//! Defines the built-in provider catalog: which backend each provider is,
//! how it authenticates, which wire dialect it speaks, and which models it
//! offers out of the box. Local daemons start with an empty model list that
//! discovery fills in (see `core::probe`).

use serde::{Deserialize, Serialize};

use crate::error::{InkwrightError, Result};

// =============================================================================
// Provider Enum
// =============================================================================

/// Supported AI providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Claude,
    Gemini,
    Groq,
    Together,
    Perplexity,
    Fireworks,
    DeepSeek,
    Cohere,
    Mistral,
    OpenRouter,
    Custom,
    Ollama,
    LmStudio,
}

/// How a provider expects to be reached and authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Chat-completions style REST with the key in an auth header.
    KeyAuthRest,
    /// REST with the key embedded in the request URL.
    KeyInUrlRest,
    /// Locally running inference server, no key required.
    LocalDaemon,
    /// User-supplied OpenAI-compatible endpoint.
    CustomEndpoint,
}

/// The wire protocol family a provider speaks.
///
/// Determines the request body shape and where the reply text lives in the
/// response JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireDialect {
    /// OpenAI chat completions: reply at `choices[0].message.content`.
    OpenAiChat,
    /// Anthropic messages: reply at `content[0].text`.
    AnthropicMessages,
    /// Gemini generateContent: reply at `candidates[0].content.parts[0].text`.
    GeminiGenerateContent,
    /// Ollama native chat: reply at `message.content`.
    OllamaChat,
}

impl Provider {
    /// All providers in catalog order.
    pub const ALL: &'static [Self] = &[
        Self::OpenAi,
        Self::Claude,
        Self::Gemini,
        Self::Groq,
        Self::Together,
        Self::Perplexity,
        Self::Fireworks,
        Self::DeepSeek,
        Self::Cohere,
        Self::Mistral,
        Self::OpenRouter,
        Self::Custom,
        Self::Ollama,
        Self::LmStudio,
    ];

    /// Local daemons, probed and discovered together.
    pub const LOCAL: &'static [Self] = &[Self::Ollama, Self::LmStudio];

    /// CLI name for this provider.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::Together => "together",
            Self::Perplexity => "perplexity",
            Self::Fireworks => "fireworks",
            Self::DeepSeek => "deepseek",
            Self::Cohere => "cohere",
            Self::Mistral => "mistral",
            Self::OpenRouter => "openrouter",
            Self::Custom => "custom",
            Self::Ollama => "ollama",
            Self::LmStudio => "lmstudio",
        }
    }

    /// Display name for human output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Claude => "Claude",
            Self::Gemini => "Google Gemini",
            Self::Groq => "Groq",
            Self::Together => "Together AI",
            Self::Perplexity => "Perplexity",
            Self::Fireworks => "Fireworks AI",
            Self::DeepSeek => "DeepSeek",
            Self::Cohere => "Cohere",
            Self::Mistral => "Mistral AI",
            Self::OpenRouter => "OpenRouter",
            Self::Custom => "Custom OpenAI Compatible",
            Self::Ollama => "Ollama",
            Self::LmStudio => "LM Studio",
        }
    }

    /// Parse from CLI argument.
    pub fn from_cli_name(name: &str) -> Result<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .iter()
            .find(|p| p.cli_name() == lower)
            .copied()
            .ok_or_else(|| InkwrightError::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// The connection shape of this provider.
    #[must_use]
    pub const fn kind(self) -> ProviderKind {
        match self {
            Self::Gemini => ProviderKind::KeyInUrlRest,
            Self::Ollama | Self::LmStudio => ProviderKind::LocalDaemon,
            Self::Custom => ProviderKind::CustomEndpoint,
            _ => ProviderKind::KeyAuthRest,
        }
    }

    /// The wire dialect this provider speaks.
    #[must_use]
    pub const fn dialect(self) -> WireDialect {
        match self {
            Self::Claude => WireDialect::AnthropicMessages,
            Self::Gemini => WireDialect::GeminiGenerateContent,
            Self::Ollama => WireDialect::OllamaChat,
            _ => WireDialect::OpenAiChat,
        }
    }

    /// Whether this provider requires an API key.
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama | Self::LmStudio)
    }

    /// Whether this provider is a local daemon subject to model discovery.
    #[must_use]
    pub const fn is_local_daemon(self) -> bool {
        matches!(self, Self::Ollama | Self::LmStudio)
    }

    /// Built-in endpoint, if the provider has one.
    ///
    /// Local daemons carry their base URL; dialect-specific paths are
    /// appended by the dispatcher and prober. The custom provider has no
    /// endpoint until the user configures one.
    #[must_use]
    pub const fn default_endpoint(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("https://api.openai.com/v1/chat/completions"),
            Self::Claude => Some("https://api.anthropic.com/v1/messages"),
            Self::Gemini => Some("https://generativelanguage.googleapis.com/v1beta/models"),
            Self::Groq => Some("https://api.groq.com/openai/v1/chat/completions"),
            Self::Together => Some("https://api.together.xyz/v1/chat/completions"),
            Self::Perplexity => Some("https://api.perplexity.ai/chat/completions"),
            Self::Fireworks => Some("https://api.fireworks.ai/inference/v1/chat/completions"),
            Self::DeepSeek => Some("https://api.deepseek.com/chat/completions"),
            Self::Cohere => {
                Some("https://api.cohere.ai/compatibility/v1/chat/completions")
            }
            Self::Mistral => Some("https://api.mistral.ai/v1/chat/completions"),
            Self::OpenRouter => Some("https://openrouter.ai/api/v1/chat/completions"),
            Self::Custom => None,
            Self::Ollama => Some("http://localhost:11434"),
            Self::LmStudio => Some("http://localhost:1234"),
        }
    }

    /// Built-in model catalog, in display order.
    ///
    /// Local daemons start empty; their lists come from discovery.
    #[must_use]
    pub const fn default_models(self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &[
                "gpt-4.1-2025-04-14",
                "o3-2025-04-16",
                "o4-mini-2025-04-16",
                "gpt-4.1-mini-2025-04-14",
                "gpt-4o",
            ],
            Self::Claude => &[
                "claude-opus-4-20250514",
                "claude-sonnet-4-20250514",
                "claude-3-5-haiku-20241022",
                "claude-3-7-sonnet-20250219",
                "claude-3-5-sonnet-20241022",
            ],
            Self::Gemini => &[
                "gemini-2.0-flash-exp",
                "gemini-1.5-pro-002",
                "gemini-1.5-pro",
                "gemini-1.5-flash-002",
                "gemini-1.5-flash",
                "gemini-1.5-flash-8b",
                "gemini-pro",
            ],
            Self::Groq => &[
                "llama-3.3-70b-versatile",
                "llama-3.1-70b-versatile",
                "llama-3.1-8b-instant",
                "llama3-70b-8192",
                "llama3-8b-8192",
                "mixtral-8x7b-32768",
                "gemma2-9b-it",
            ],
            Self::Together => &[
                "meta-llama/Llama-3.2-90B-Vision-Instruct-Turbo",
                "meta-llama/Meta-Llama-3.1-405B-Instruct-Turbo",
                "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo",
                "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
                "mistralai/Mixtral-8x7B-Instruct-v0.1",
                "mistralai/Mistral-7B-Instruct-v0.3",
                "Qwen/Qwen2.5-72B-Instruct",
            ],
            Self::Perplexity => &[
                "llama-3.1-sonar-small-128k-online",
                "llama-3.1-sonar-large-128k-online",
                "llama-3.1-sonar-huge-128k-online",
                "llama-3.1-8b-instruct",
                "llama-3.1-70b-instruct",
            ],
            Self::Fireworks => &[
                "accounts/fireworks/models/llama-v3p1-405b-instruct",
                "accounts/fireworks/models/llama-v3p1-70b-instruct",
                "accounts/fireworks/models/llama-v3p1-8b-instruct",
                "accounts/fireworks/models/mixtral-8x7b-instruct",
                "accounts/fireworks/models/qwen2p5-72b-instruct",
            ],
            Self::DeepSeek => &["deepseek-chat", "deepseek-coder", "deepseek-reasoner"],
            Self::Cohere => &[
                "command-r-plus",
                "command-r",
                "command-nightly",
                "command-light-nightly",
            ],
            Self::Mistral => &[
                "mistral-large-2407",
                "mistral-medium-2312",
                "mistral-small-2402",
                "open-mistral-7b",
                "open-mixtral-8x7b",
                "open-mixtral-8x22b",
                "codestral-2405",
            ],
            Self::OpenRouter => &[
                "openai/gpt-3.5-turbo",
                "meta-llama/llama-3.2-3b-instruct:free",
                "meta-llama/llama-3.1-8b-instruct:free",
                "microsoft/phi-3-mini-128k-instruct:free",
                "google/gemma-2-9b-it:free",
                "mistralai/mistral-7b-instruct:free",
                "mistralai/mixtral-8x7b-instruct:free",
                "anthropic/claude-3-haiku:beta",
                "cohere/command-r:free",
                "qwen/qwen-2.5-7b-instruct:free",
                "deepseek/deepseek-chat:free",
            ],
            Self::Custom => &["custom-model"],
            Self::Ollama | Self::LmStudio => &[],
        }
    }

    /// Known key prefix for warn-only format validation.
    #[must_use]
    pub const fn key_prefix_hint(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("sk-"),
            Self::Claude => Some("sk-ant-"),
            Self::Gemini => Some("AIza"),
            Self::Groq => Some("gsk_"),
            Self::OpenRouter => Some("sk-or-"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

// =============================================================================
// Provider Descriptor
// =============================================================================

/// Immutable description of a provider's connection shape and model catalog.
///
/// Descriptors are published through the registry as `Arc` snapshots; model
/// discovery replaces a snapshot rather than mutating one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub id: Provider,
    pub kind: ProviderKind,
    pub dialect: WireDialect,
    pub models: Vec<String>,
    pub requires_api_key: bool,
    pub endpoint: Option<String>,
}

impl ProviderDescriptor {
    /// Build the built-in descriptor for a provider.
    #[must_use]
    pub fn builtin(provider: Provider) -> Self {
        Self {
            id: provider,
            kind: provider.kind(),
            dialect: provider.dialect(),
            models: provider
                .default_models()
                .iter()
                .map(|m| (*m).to_string())
                .collect(),
            requires_api_key: provider.requires_api_key(),
            endpoint: provider.default_endpoint().map(str::to_string),
        }
    }

    /// First model in the catalog, used as the selection fallback.
    #[must_use]
    pub fn default_model(&self) -> Option<&str> {
        self.models.first().map(String::as_str)
    }

    /// Whether the catalog offers the given model.
    #[must_use]
    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    /// A copy of this descriptor with a replacement model list.
    ///
    /// Used by discovery to publish a refreshed snapshot.
    #[must_use]
    pub fn with_models(&self, models: Vec<String>) -> Self {
        Self {
            models,
            ..self.clone()
        }
    }

    /// A copy of this descriptor with a replacement endpoint.
    #[must_use]
    pub fn with_endpoint(&self, endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            ..self.clone()
        }
    }
}

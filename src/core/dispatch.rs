//! Live request dispatch.
//!
//! Builds the wire request for a provider's dialect, sends it, and pulls the
//! reply text out of the dialect-specific response shape. Callers get either
//! normalized text or a single taxonomy error; nothing provider-specific
//! leaks past this module.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

use crate::core::http::{self, DEFAULT_TIMEOUT};
use crate::core::prompt::Action;
use crate::core::provider::{Provider, ProviderDescriptor, ProviderKind, WireDialect};
use crate::error::{InkwrightError, Result};
use crate::util::ellipsize;

/// Protocol version sent with every Anthropic request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Attribution headers OpenRouter asks integrators to send.
const OPENROUTER_SITE: &str = "https://github.com/inkwright/inkwright";
const OPENROUTER_TITLE: &str = "Inkwright";

/// Longest upstream error body echoed into error details.
const ERROR_SNIPPET_CHARS: usize = 200;

// =============================================================================
// Request parameters
// =============================================================================

/// Sampling parameters forwarded to every backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Sends prompts to live providers and normalizes their replies.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout)?,
            timeout,
        })
    }

    /// Send `prompt` to the provider described by `descriptor` and return the
    /// reply text.
    ///
    /// The reply is extracted from the dialect's response shape but not
    /// otherwise rewritten; see [`clean_response`] for the cosmetic pass.
    pub async fn send(
        &self,
        descriptor: &ProviderDescriptor,
        api_key: Option<&str>,
        model: &str,
        prompt: &str,
        params: RequestParams,
    ) -> Result<String> {
        let provider = descriptor.id;
        let key = api_key.unwrap_or("");
        if descriptor.requires_api_key && key.is_empty() {
            return Err(InkwrightError::MissingCredential {
                provider: provider.display_name().to_string(),
            });
        }

        let url = request_url(descriptor, model, key)?;
        let body = request_body(descriptor.dialect, model, prompt, params);
        let request = apply_auth(self.client.post(&url).json(&body), descriptor, key);

        tracing::debug!(
            provider = %provider,
            model,
            url = %redact_key(&url),
            "dispatching request"
        );

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InkwrightError::Timeout {
                    provider: provider.display_name().to_string(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                InkwrightError::Network(format!(
                    "request to {} failed: {e}",
                    provider.display_name()
                ))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InkwrightError::Upstream {
                provider: provider.display_name().to_string(),
                detail: format!("HTTP {}: {}", status.as_u16(), snippet(&detail)),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| InkwrightError::MalformedResponse {
                provider: provider.display_name().to_string(),
                detail: format!("unparseable body: {e}"),
            })?;

        let text =
            extract_text(descriptor.dialect, &payload).ok_or_else(|| {
                InkwrightError::MalformedResponse {
                    provider: provider.display_name().to_string(),
                    detail: format!("reply text missing at {}", reply_path(descriptor.dialect)),
                }
            })?;
        if text.trim().is_empty() {
            return Err(InkwrightError::MalformedResponse {
                provider: provider.display_name().to_string(),
                detail: "empty completion".to_string(),
            });
        }

        tracing::debug!(provider = %provider, model, chars = text.len(), "reply received");
        Ok(text)
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

/// Resolve the full request URL for a dispatch.
///
/// Remote chat providers carry full URLs in their descriptors; local daemons
/// carry a base URL that the dialect path is appended to. Gemini rides its
/// key in the query string.
pub(crate) fn request_url(
    descriptor: &ProviderDescriptor,
    model: &str,
    api_key: &str,
) -> Result<String> {
    let base = descriptor
        .endpoint
        .as_deref()
        .ok_or_else(|| InkwrightError::NoEndpoint {
            provider: descriptor.id.display_name().to_string(),
        })?;
    let base = base.trim_end_matches('/');
    Ok(match descriptor.dialect {
        WireDialect::GeminiGenerateContent => {
            format!("{base}/{model}:generateContent?key={api_key}")
        }
        WireDialect::OllamaChat => format!("{base}/api/chat"),
        WireDialect::OpenAiChat if descriptor.kind == ProviderKind::LocalDaemon => {
            format!("{base}/v1/chat/completions")
        }
        WireDialect::OpenAiChat | WireDialect::AnthropicMessages => base.to_string(),
    })
}

/// Build the request body for a dialect.
pub(crate) fn request_body(
    dialect: WireDialect,
    model: &str,
    prompt: &str,
    params: RequestParams,
) -> Value {
    match dialect {
        WireDialect::OpenAiChat => json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        }),
        WireDialect::AnthropicMessages => json!({
            "model": model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "messages": [{"role": "user", "content": prompt}],
        }),
        WireDialect::GeminiGenerateContent => json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": params.max_tokens,
                "temperature": params.temperature,
            },
        }),
        WireDialect::OllamaChat => json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false,
            "options": {
                "num_predict": params.max_tokens,
                "temperature": params.temperature,
            },
        }),
    }
}

/// Attach the dialect's authentication to a request.
pub(crate) fn apply_auth(
    request: RequestBuilder,
    descriptor: &ProviderDescriptor,
    key: &str,
) -> RequestBuilder {
    match descriptor.dialect {
        WireDialect::AnthropicMessages => request
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION),
        // The key rides in the URL
        WireDialect::GeminiGenerateContent => request,
        WireDialect::OpenAiChat | WireDialect::OllamaChat => {
            let request = if key.is_empty() {
                request
            } else {
                request.bearer_auth(key)
            };
            if descriptor.id == Provider::OpenRouter {
                request
                    .header("HTTP-Referer", OPENROUTER_SITE)
                    .header("X-Title", OPENROUTER_TITLE)
            } else {
                request
            }
        }
    }
}

/// Pull the reply text out of a dialect's response shape.
fn extract_text(dialect: WireDialect, payload: &Value) -> Option<String> {
    payload
        .pointer(reply_pointer(dialect))?
        .as_str()
        .map(str::to_string)
}

const fn reply_pointer(dialect: WireDialect) -> &'static str {
    match dialect {
        WireDialect::OpenAiChat => "/choices/0/message/content",
        WireDialect::AnthropicMessages => "/content/0/text",
        WireDialect::GeminiGenerateContent => "/candidates/0/content/parts/0/text",
        WireDialect::OllamaChat => "/message/content",
    }
}

/// Dotted reply location for error messages.
const fn reply_path(dialect: WireDialect) -> &'static str {
    match dialect {
        WireDialect::OpenAiChat => "choices[0].message.content",
        WireDialect::AnthropicMessages => "content[0].text",
        WireDialect::GeminiGenerateContent => "candidates[0].content.parts[0].text",
        WireDialect::OllamaChat => "message.content",
    }
}

// =============================================================================
// Response cleaning
// =============================================================================

static LEADING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(here's|here is|sure|certainly|of course)[^:\n]*:\s*").unwrap()
});
static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(the improved|the shortened|the expanded|the corrected)[^:\n]*:\s*").unwrap()
});

/// Strip conversational filler a model wraps around its answer.
///
/// Quote unwrapping only applies to actions whose result replaces or extends
/// the user's prose; analytical outputs may quote the text legitimately.
#[must_use]
pub fn clean_response(action: Action, raw: &str) -> String {
    let trimmed = raw.trim();
    let cleaned = LEADING_FILLER.replace(trimmed, "");
    let cleaned = LEADING_LABEL.replace(&cleaned, "");
    let mut cleaned = cleaned.trim().to_string();

    let unwraps_quotes = matches!(
        action,
        Action::Improve | Action::Expand | Action::ContinueStory
    );
    if unwraps_quotes && cleaned.len() >= 2 {
        let double = cleaned.starts_with('"') && cleaned.ends_with('"');
        let single = cleaned.starts_with('\'') && cleaned.ends_with('\'');
        if double || single {
            cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
        }
    }
    cleaned
}

/// Truncate an upstream error body for log and error detail use.
fn snippet(body: &str) -> String {
    ellipsize(body.trim(), ERROR_SNIPPET_CHARS)
}

/// Mask a URL-borne API key before it reaches a log line.
fn redact_key(url: &str) -> String {
    match url.split_once("key=") {
        Some((head, _)) => format!("{head}key=***"),
        None => url.to_string(),
    }
}

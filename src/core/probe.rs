//! Connection probing and local model discovery.
//!
//! Answers "can this provider be reached and authenticated right now"
//! without touching durable state beyond a transient last-checked timestamp.
//! Keyed providers get a minimal chat request; local daemons get a models
//! listing, which doubles as the discovery feed for the registry.
//!
//! Custom endpoints are judged optimistically: a non-auth 4xx proves a
//! server is listening, and a transport failure with a key configured is
//! reported as unverified rather than down, since middleboxes commonly
//! block probes that the real dispatch path would survive.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::dispatch::{self, RequestParams};
use crate::core::http;
use crate::core::provider::{Provider, ProviderDescriptor, ProviderKind, WireDialect};
use crate::error::{InkwrightError, Result};

/// Body text for keyed-provider probes; short enough that ten output tokens
/// cover the expected reply.
const PROBE_MESSAGE: &str = "Hello, this is a connection test. Please respond with \"OK\".";

/// Sampling bounds for probe requests.
const PROBE_PARAMS: RequestParams = RequestParams {
    max_tokens: 10,
    temperature: 0.0,
};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of probing one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The provider answered and accepted the probe.
    Reachable,
    /// The provider could not be reached or rejected the credentials.
    Unreachable,
    /// The probe could not complete but the provider may still work; shown
    /// distinctly so users are not told a working setup is down.
    Unverified,
}

impl ProbeOutcome {
    /// Whether dispatching to this provider is worth attempting.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Reachable | Self::Unverified)
    }
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
            Self::Unverified => "unverified",
        };
        write!(f, "{name}")
    }
}

/// Full record of a probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub provider: Provider,
    pub outcome: ProbeOutcome,
    pub detail: String,
    /// Models discovered while probing a local daemon.
    pub discovered_models: Option<Vec<String>>,
    pub checked_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl ProbeReport {
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.outcome.is_usable()
    }
}

// =============================================================================
// Prober
// =============================================================================

/// Runs reachability checks against providers.
#[derive(Debug)]
pub struct Prober {
    client: Client,
    last_checked: Mutex<HashMap<Provider, DateTime<Utc>>>,
}

impl Prober {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http::build_client(http::PROBE_TIMEOUT)?,
            last_checked: Mutex::new(HashMap::new()),
        })
    }

    /// Probe one provider. Never fails; every failure mode folds into the
    /// report's outcome and detail.
    pub async fn probe(
        &self,
        descriptor: &ProviderDescriptor,
        api_key: Option<&str>,
    ) -> ProbeReport {
        let started = Instant::now();
        let (outcome, detail, discovered_models) = match descriptor.kind {
            ProviderKind::LocalDaemon => self.probe_daemon(descriptor).await,
            ProviderKind::CustomEndpoint => {
                let (outcome, detail) = self.probe_custom(descriptor, api_key).await;
                (outcome, detail, None)
            }
            ProviderKind::KeyAuthRest | ProviderKind::KeyInUrlRest => {
                let (outcome, detail) = self.probe_keyed(descriptor, api_key).await;
                (outcome, detail, None)
            }
        };

        let checked_at = Utc::now();
        self.mark_checked(descriptor.id, checked_at);
        tracing::debug!(
            provider = %descriptor.id,
            outcome = %outcome,
            detail = %detail,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe finished"
        );

        ProbeReport {
            provider: descriptor.id,
            outcome,
            detail,
            discovered_models,
            checked_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// When this provider was last probed, if ever.
    #[must_use]
    pub fn last_checked(&self, provider: Provider) -> Option<DateTime<Utc>> {
        self.last_checked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
            .copied()
    }

    /// Fetch the model list from a local daemon.
    ///
    /// This is the discovery feed: callers publish the returned list through
    /// the registry. An empty list is a successful fetch of a daemon with
    /// nothing installed, not an error.
    pub async fn discover_models(&self, descriptor: &ProviderDescriptor) -> Result<Vec<String>> {
        let url = models_url(descriptor)?;
        match descriptor.dialect {
            WireDialect::OllamaChat => {
                let tags: OllamaTags = http::fetch_json(&self.client, &url).await?;
                Ok(tags.models.into_iter().map(|m| m.name).collect())
            }
            _ => {
                let listing: OpenAiModels = http::fetch_json(&self.client, &url).await?;
                Ok(listing.data.into_iter().map(|m| m.id).collect())
            }
        }
    }

    async fn probe_keyed(
        &self,
        descriptor: &ProviderDescriptor,
        api_key: Option<&str>,
    ) -> (ProbeOutcome, String) {
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return (
                ProbeOutcome::Unreachable,
                "no API key configured".to_string(),
            );
        };
        match self.send_probe(descriptor, key).await {
            Ok(status) if status.is_success() => {
                (ProbeOutcome::Reachable, "probe accepted".to_string())
            }
            Ok(status)
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                (
                    ProbeOutcome::Unreachable,
                    format!("API key rejected (HTTP {})", status.as_u16()),
                )
            }
            Ok(status) => (
                ProbeOutcome::Unreachable,
                format!("unexpected HTTP {}", status.as_u16()),
            ),
            Err(e) => (ProbeOutcome::Unreachable, e.to_string()),
        }
    }

    async fn probe_custom(
        &self,
        descriptor: &ProviderDescriptor,
        api_key: Option<&str>,
    ) -> (ProbeOutcome, String) {
        if descriptor.endpoint.is_none() {
            return (
                ProbeOutcome::Unreachable,
                "no endpoint configured".to_string(),
            );
        }
        let key = api_key.unwrap_or("").trim();
        match self.send_probe(descriptor, key).await {
            Ok(status) if status.is_success() => {
                (ProbeOutcome::Reachable, "probe accepted".to_string())
            }
            Ok(status) if status == StatusCode::UNAUTHORIZED => (
                ProbeOutcome::Unreachable,
                "API key rejected (HTTP 401)".to_string(),
            ),
            // Any other 4xx still proves a server answered at this endpoint
            Ok(status) if status.is_client_error() => (
                ProbeOutcome::Reachable,
                format!("endpoint answered HTTP {}", status.as_u16()),
            ),
            Ok(status) => (
                ProbeOutcome::Unreachable,
                format!("unexpected HTTP {}", status.as_u16()),
            ),
            Err(e) if !key.is_empty() => {
                tracing::warn!(
                    provider = %descriptor.id,
                    error = %e,
                    "custom endpoint probe could not complete, reporting unverified"
                );
                (
                    ProbeOutcome::Unverified,
                    format!("probe blocked in transit, endpoint not verified: {e}"),
                )
            }
            Err(e) => (ProbeOutcome::Unreachable, e.to_string()),
        }
    }

    async fn probe_daemon(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> (ProbeOutcome, String, Option<Vec<String>>) {
        match self.discover_models(descriptor).await {
            Ok(models) if models.is_empty() => (
                ProbeOutcome::Unreachable,
                "daemon answered but no models are installed".to_string(),
                Some(models),
            ),
            Ok(models) => (
                ProbeOutcome::Reachable,
                format!("{} models installed", models.len()),
                Some(models),
            ),
            Err(e) => (ProbeOutcome::Unreachable, e.to_string(), None),
        }
    }

    /// Send the minimal chat probe and return the HTTP status.
    async fn send_probe(
        &self,
        descriptor: &ProviderDescriptor,
        key: &str,
    ) -> Result<StatusCode> {
        let model = descriptor.default_model().unwrap_or("probe");
        let url = dispatch::request_url(descriptor, model, key)?;
        let body = dispatch::request_body(descriptor.dialect, model, PROBE_MESSAGE, PROBE_PARAMS);
        let request = dispatch::apply_auth(self.client.post(&url).json(&body), descriptor, key);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InkwrightError::Timeout {
                    provider: descriptor.id.display_name().to_string(),
                    seconds: http::PROBE_TIMEOUT.as_secs(),
                }
            } else {
                InkwrightError::Network(format!(
                    "probe of {} failed: {e}",
                    descriptor.id.display_name()
                ))
            }
        })?;
        Ok(response.status())
    }

    fn mark_checked(&self, provider: Provider, at: DateTime<Utc>) {
        self.last_checked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, at);
    }
}

/// Models-listing URL for a local daemon.
fn models_url(descriptor: &ProviderDescriptor) -> Result<String> {
    let base = descriptor
        .endpoint
        .as_deref()
        .ok_or_else(|| InkwrightError::NoEndpoint {
            provider: descriptor.id.display_name().to_string(),
        })?;
    let base = base.trim_end_matches('/');
    Ok(match descriptor.dialect {
        WireDialect::OllamaChat => format!("{base}/api/tags"),
        _ => format!("{base}/v1/models"),
    })
}

// =============================================================================
// Daemon listing shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiModels {
    #[serde(default)]
    data: Vec<OpenAiModel>,
}

#[derive(Debug, Deserialize)]
struct OpenAiModel {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usability_per_outcome() {
        assert!(ProbeOutcome::Reachable.is_usable());
        assert!(ProbeOutcome::Unverified.is_usable());
        assert!(!ProbeOutcome::Unreachable.is_usable());
    }

    #[test]
    fn outcome_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProbeOutcome::Unverified).unwrap(),
            "\"unverified\""
        );
        let back: ProbeOutcome = serde_json::from_str("\"reachable\"").unwrap();
        assert_eq!(back, ProbeOutcome::Reachable);
    }

    #[test]
    fn models_url_per_daemon() {
        let ollama = ProviderDescriptor::builtin(Provider::Ollama);
        assert_eq!(models_url(&ollama).unwrap(), "http://localhost:11434/api/tags");
        let lmstudio = ProviderDescriptor::builtin(Provider::LmStudio);
        assert_eq!(models_url(&lmstudio).unwrap(), "http://localhost:1234/v1/models");
    }

    #[test]
    fn parses_ollama_tags() {
        let tags: OllamaTags = serde_json::from_value(serde_json::json!({
            "models": [
                {"name": "llama3.2", "size": 2019393189u64},
                {"name": "mistral", "size": 4113301824u64}
            ]
        }))
        .unwrap();
        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama3.2", "mistral"]);
    }

    #[test]
    fn parses_openai_model_listing() {
        let listing: OpenAiModels = serde_json::from_value(serde_json::json!({
            "object": "list",
            "data": [{"id": "qwen2.5-7b-instruct", "object": "model"}]
        }))
        .unwrap();
        assert_eq!(listing.data[0].id, "qwen2.5-7b-instruct");
    }

    #[test]
    fn missing_listing_fields_default_empty() {
        let tags: OllamaTags = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(tags.models.is_empty());
        let listing: OpenAiModels = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(listing.data.is_empty());
    }

    #[tokio::test]
    async fn keyed_probe_without_key_short_circuits() {
        let prober = Prober::new().unwrap();
        let descriptor = ProviderDescriptor::builtin(Provider::OpenAi);
        assert!(prober.last_checked(Provider::OpenAi).is_none());

        let report = prober.probe(&descriptor, None).await;
        assert_eq!(report.outcome, ProbeOutcome::Unreachable);
        assert!(report.detail.contains("no API key"));
        assert!(prober.last_checked(Provider::OpenAi).is_some());
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        let prober = Prober::new().unwrap();
        let descriptor = ProviderDescriptor::builtin(Provider::Groq);
        let report = prober.probe(&descriptor, Some("   ")).await;
        assert_eq!(report.outcome, ProbeOutcome::Unreachable);
        assert!(report.detail.contains("no API key"));
    }

    #[tokio::test]
    async fn custom_without_endpoint_is_unreachable() {
        let prober = Prober::new().unwrap();
        let descriptor = ProviderDescriptor::builtin(Provider::Custom);
        let report = prober.probe(&descriptor, Some("some-key")).await;
        assert_eq!(report.outcome, ProbeOutcome::Unreachable);
        assert!(report.detail.contains("no endpoint"));
    }
}

//! The single entry point that turns a writing action into text.
//!
//! Wires the registry, credential store, cache, dispatcher, offline
//! processor, and prober together behind a small facade. The contract it
//! enforces: validation and credential problems surface as errors, every
//! transport or provider failure is absorbed by the offline fallback, and
//! the caller always gets some usable text once input passes validation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;

use crate::core::cache::ResponseCache;
use crate::core::dispatch::{self, Dispatcher};
use crate::core::offline::{OfflineProcessor, ProcessingDelay};
use crate::core::probe::{ProbeReport, Prober};
use crate::core::prompt::{self, Action};
use crate::core::provider::{Provider, ProviderDescriptor};
use crate::core::registry::ProviderRegistry;
use crate::error::{InkwrightError, Result};
use crate::storage::{CredentialStore, ProcessingSettings, Selection};

/// Minimum input length in characters.
const MIN_INPUT_CHARS: usize = 3;
/// Maximum input length in characters.
const MAX_INPUT_CHARS: usize = 10_000;
/// Maximum accepted reply length in characters.
const MAX_RESPONSE_CHARS: usize = 10_000;
/// Replies shorter than this that mention "error" are treated as error
/// payloads a provider returned with HTTP 200.
const ERRORISH_REPLY_CHARS: usize = 100;

/// Suggestion list bounds.
const MIN_SUGGESTIONS: usize = 3;
const MAX_SUGGESTIONS: usize = 5;

/// Markup that is never processed, whatever the action.
static UNSAFE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<script\b",
        r"(?i)javascript:",
        r"(?i)\bon\w+\s*=",
        r"(?is)<iframe\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Advisory strings used when suggestion generation cannot produce a
/// usable list.
const FALLBACK_SUGGESTIONS: &[&str] = &[
    "Consider adding more descriptive details to enhance the scene",
    "This might be a good place to show character emotions",
    "You could expand on the setting to create better atmosphere",
    "Consider varying your sentence structure for better flow",
    "This section could benefit from more dialogue",
];

// =============================================================================
// Outcomes
// =============================================================================

/// Where a processing result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A live provider produced it.
    Live,
    /// The offline processor produced it.
    Offline,
    /// Served from the response cache.
    Cache,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Live => "live",
            Self::Offline => "offline",
            Self::Cache => "cache",
        };
        write!(f, "{name}")
    }
}

/// A processed result and its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub text: String,
    pub origin: Origin,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Facade over the whole request pipeline.
pub struct Orchestrator {
    registry: ProviderRegistry,
    credentials: Mutex<CredentialStore>,
    settings: ProcessingSettings,
    cache: ResponseCache,
    dispatcher: Dispatcher,
    offline: OfflineProcessor,
    prober: Prober,
    testing: AtomicBool,
}

impl Orchestrator {
    /// Build an orchestrator over a credential store and settings.
    pub fn new(credentials: CredentialStore, settings: ProcessingSettings) -> Result<Self> {
        Ok(Self {
            registry: ProviderRegistry::new(),
            cache: ResponseCache::new(settings.cache_ttl()),
            dispatcher: Dispatcher::new()?,
            offline: OfflineProcessor::default(),
            prober: Prober::new()?,
            credentials: Mutex::new(credentials),
            settings,
            testing: AtomicBool::new(false),
        })
    }

    /// Replace the dispatch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.dispatcher = Dispatcher::with_timeout(timeout)?;
        Ok(self)
    }

    /// Replace the offline processor's simulated latency band.
    #[must_use]
    pub fn with_offline_delay(mut self, delay: ProcessingDelay) -> Self {
        self.offline = OfflineProcessor::new(delay);
        self
    }

    /// The provider registry, for endpoint overrides and catalog queries.
    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Publish configured endpoint overrides into the registry.
    pub fn apply_endpoint_overrides(&self, overrides: &[(Provider, String)]) -> Result<()> {
        for (provider, endpoint) in overrides {
            self.registry.set_endpoint(*provider, Some(endpoint.clone()))?;
            tracing::debug!(provider = %provider, endpoint = %endpoint, "endpoint override applied");
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Processing
    // -------------------------------------------------------------------------

    /// Run a writing action over `text` and return the result with its
    /// provenance.
    ///
    /// # Errors
    ///
    /// Only validation and credential problems surface as errors. Transport
    /// and provider failures downgrade to the offline processor.
    pub async fn process_text(&self, text: &str, action: Action) -> Result<ProcessOutcome> {
        validate_input(text)?;

        let (descriptor, model, key) = self.resolve()?;
        let provider = descriptor.id;

        let fingerprint = ResponseCache::fingerprint(
            provider,
            model.as_deref().unwrap_or(""),
            action,
            text,
        );
        if self.settings.cache_enabled {
            if let Some(hit) = self.cache.get(&fingerprint) {
                tracing::debug!(provider = %provider, action = %action, "cache hit");
                return Ok(ProcessOutcome {
                    text: hit,
                    origin: Origin::Cache,
                });
            }
        }

        let prompt = prompt::build(action, text);
        let (result, origin) = match model.as_deref() {
            None => {
                tracing::warn!(
                    provider = %provider,
                    action = %action,
                    "no model available for dispatch, downgrading to offline processing"
                );
                (self.offline.process(text, action, "offline").await, Origin::Offline)
            }
            Some(model) => {
                let sent = self
                    .dispatcher
                    .send(
                        &descriptor,
                        key.as_deref(),
                        model,
                        &prompt,
                        self.settings.request_params(),
                    )
                    .await
                    .map(|raw| dispatch::clean_response(action, &raw))
                    .and_then(|cleaned| {
                        validate_response(provider, &cleaned)?;
                        Ok(cleaned)
                    });
                match sent {
                    Ok(live) => (live, Origin::Live),
                    Err(e) if e.is_absorbed_by_fallback() => {
                        tracing::warn!(
                            provider = %provider,
                            model = %model,
                            code = e.error_code(),
                            error = %e,
                            "live dispatch failed, downgrading to offline processing"
                        );
                        (self.offline.process(text, action, model).await, Origin::Offline)
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if self.settings.cache_enabled {
            self.cache.put(fingerprint, result.clone());
        }
        Ok(ProcessOutcome {
            text: result,
            origin,
        })
    }

    /// Produce 3-5 short advisory strings for the given writing context.
    ///
    /// Never fails: empty input yields an empty list, and every failure
    /// path lands on the built-in advisory pool.
    pub async fn generate_suggestions(&self, context: &str) -> Vec<String> {
        if context.trim().is_empty() {
            return Vec::new();
        }
        match self.process_text(context, Action::ContextSuggestion).await {
            Ok(outcome) => {
                let parsed = suggestions_from(&outcome.text);
                if parsed.len() >= MIN_SUGGESTIONS {
                    parsed
                } else {
                    top_up_suggestions(parsed, context)
                }
            }
            Err(e) => {
                tracing::debug!(
                    code = e.error_code(),
                    error = %e,
                    "suggestion generation fell back to the advisory pool"
                );
                fallback_suggestions(context)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Probing
    // -------------------------------------------------------------------------

    /// Probe a provider's reachability.
    ///
    /// Local-daemon probes double as model discovery; any discovered list is
    /// published into the registry.
    pub async fn test_connection(&self, provider: Provider) -> Result<ProbeReport> {
        let descriptor = self.registry.get(provider)?;
        let key = self
            .lock_credentials()
            .get_key(provider)
            .map(str::to_string);

        self.testing.store(true, Ordering::SeqCst);
        let report = self.prober.probe(&descriptor, key.as_deref()).await;
        if let Some(models) = report.discovered_models.clone() {
            if let Err(e) = self.registry.refresh(provider, models) {
                tracing::warn!(provider = %provider, error = %e, "could not publish discovered models");
            }
        }
        self.testing.store(false, Ordering::SeqCst);
        Ok(report)
    }

    /// Whether a connection test is currently running, so callers can
    /// disable repeat invocations.
    #[must_use]
    pub fn is_testing(&self) -> bool {
        self.testing.load(Ordering::SeqCst)
    }

    /// Refresh the model catalogs of all local daemons concurrently.
    ///
    /// Returns one entry per daemon with the discovered model count or the
    /// failure that prevented discovery.
    pub async fn refresh_local_models(&self) -> Vec<(Provider, Result<usize>)> {
        let descriptors: Vec<Arc<ProviderDescriptor>> = Provider::LOCAL
            .iter()
            .filter_map(|p| self.registry.get(*p).ok())
            .collect();
        let fetches = descriptors
            .iter()
            .map(|descriptor| self.prober.discover_models(descriptor));
        let results = futures::future::join_all(fetches).await;

        descriptors
            .iter()
            .zip(results)
            .map(|(descriptor, result)| {
                let provider = descriptor.id;
                let outcome = result.and_then(|models| {
                    let count = models.len();
                    self.registry.refresh(provider, models)?;
                    Ok(count)
                });
                (provider, outcome)
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Selection and credentials
    // -------------------------------------------------------------------------

    /// Switch the active provider, correcting the model selection to one
    /// the provider offers.
    pub fn set_provider(&self, provider: Provider) -> Result<Selection> {
        let descriptor = self.registry.get(provider)?;
        let mut credentials = self.lock_credentials();
        credentials.set_provider(provider, &descriptor.models)?;
        Ok(credentials.selection().clone())
    }

    /// Select a model offered by the active provider.
    pub fn set_model(&self, model: &str) -> Result<Selection> {
        let mut credentials = self.lock_credentials();
        let provider = credentials.selection().provider;
        let descriptor = self.registry.get(provider)?;
        credentials.set_model(model, &descriptor.models)?;
        Ok(credentials.selection().clone())
    }

    /// Store an API key for a provider.
    pub fn set_api_key(&self, provider: Provider, key: &str) -> Result<()> {
        self.lock_credentials().set_key(provider, key)
    }

    /// Remove a provider's API key.
    pub fn remove_api_key(&self, provider: Provider) -> Result<()> {
        self.lock_credentials().remove_key(provider)
    }

    /// The active selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.lock_credentials().selection().clone()
    }

    /// Whether a provider has a key configured.
    #[must_use]
    pub fn has_key(&self, provider: Provider) -> bool {
        self.lock_credentials().get_key(provider).is_some()
    }

    /// Providers with a key configured.
    #[must_use]
    pub fn configured_providers(&self) -> Vec<Provider> {
        self.lock_credentials().configured_providers()
    }

    /// Every provider descriptor, in catalog order.
    #[must_use]
    pub fn list_providers(&self) -> Vec<Arc<ProviderDescriptor>> {
        self.registry.list()
    }

    // -------------------------------------------------------------------------
    // Cache
    // -------------------------------------------------------------------------

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("response cache cleared");
    }

    /// Number of cached responses.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Resolve the active descriptor, model, and credential, gating on the
    /// provider's key requirement before anything touches the network.
    fn resolve(&self) -> Result<(Arc<ProviderDescriptor>, Option<String>, Option<String>)> {
        let credentials = self.lock_credentials();
        let selection = credentials.selection().clone();
        let key = credentials.get_key(selection.provider).map(str::to_string);
        drop(credentials);

        let descriptor = self.registry.get(selection.provider)?;
        if descriptor.requires_api_key && key.is_none() {
            return Err(InkwrightError::MissingCredential {
                provider: selection.provider.display_name().to_string(),
            });
        }
        let model = selection
            .model
            .or_else(|| descriptor.default_model().map(str::to_string));
        Ok((descriptor, model, key))
    }

    fn lock_credentials(&self) -> MutexGuard<'_, CredentialStore> {
        self.credentials.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Reject empty, too-short, too-long, or unsafe input.
fn validate_input(text: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InkwrightError::InvalidInput {
            reason: "text is empty".to_string(),
        });
    }
    if trimmed.chars().count() < MIN_INPUT_CHARS {
        return Err(InkwrightError::InvalidInput {
            reason: format!("text must be at least {MIN_INPUT_CHARS} characters"),
        });
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(InkwrightError::InvalidInput {
            reason: format!("text exceeds the {MAX_INPUT_CHARS} character limit"),
        });
    }
    if UNSAFE_PATTERNS.iter().any(|pattern| pattern.is_match(text)) {
        return Err(InkwrightError::InvalidInput {
            reason: "text contains unsafe markup".to_string(),
        });
    }
    Ok(())
}

/// Reject replies no user should see: empty, oversized, or an error payload
/// delivered with HTTP 200.
fn validate_response(provider: Provider, text: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InkwrightError::MalformedResponse {
            provider: provider.display_name().to_string(),
            detail: "empty completion".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_RESPONSE_CHARS {
        return Err(InkwrightError::MalformedResponse {
            provider: provider.display_name().to_string(),
            detail: format!("reply exceeds the {MAX_RESPONSE_CHARS} character limit"),
        });
    }
    if trimmed.chars().count() < ERRORISH_REPLY_CHARS
        && trimmed.to_lowercase().contains("error")
    {
        return Err(InkwrightError::MalformedResponse {
            provider: provider.display_name().to_string(),
            detail: "reply looks like an error payload".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Suggestion parsing
// =============================================================================

static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•*]\s*").unwrap());

/// Turn a reply into a clean suggestion list: one suggestion per line,
/// bullets stripped, trivially short lines dropped, capped at five.
fn suggestions_from(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| BULLET_PREFIX.replace(line.trim(), "").trim().to_string())
        .filter(|line| line.chars().count() > 10)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Extend a too-short parsed list from the advisory pool without
/// duplicating entries.
fn top_up_suggestions(mut parsed: Vec<String>, context: &str) -> Vec<String> {
    for candidate in fallback_suggestions(context) {
        if parsed.len() >= MIN_SUGGESTIONS {
            break;
        }
        if !parsed.contains(&candidate) {
            parsed.push(candidate);
        }
    }
    parsed
}

/// A deterministic 3-4 item slice of the advisory pool, rotated by the
/// context so different passages see different advice.
fn fallback_suggestions(context: &str) -> Vec<String> {
    let start = context.len() % FALLBACK_SUGGESTIONS.len();
    let count = MIN_SUGGESTIONS + context.len() % 2;
    (0..count)
        .map(|i| FALLBACK_SUGGESTIONS[(start + i) % FALLBACK_SUGGESTIONS.len()].to_string())
        .collect()
}

//! In-memory response cache.
//!
//! Keyed by a fingerprint of the request identity (provider, model, action,
//! and a bounded prefix of the input text), so recomputing the same action on
//! the same text is free while edits anywhere in the prefix miss. Entries
//! expire after a configurable TTL and are evicted lazily on lookup.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::core::prompt::Action;
use crate::core::provider::Provider;

/// Input prefix length that participates in the fingerprint.
const KEY_PREFIX_CHARS: usize = 100;

/// Default entry lifetime (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

/// TTL cache for processed text, shared across concurrent requests.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Fingerprint for a request identity.
    ///
    /// Only the first [`KEY_PREFIX_CHARS`] characters of the input
    /// participate, matching how reprocessing tends to happen: the head of a
    /// passage is stable while the tail is being edited.
    #[must_use]
    pub fn fingerprint(provider: Provider, model: &str, action: Action, text: &str) -> String {
        let prefix: String = text.chars().take(KEY_PREFIX_CHARS).collect();
        let identity = format!("{provider}|{model}|{action}|{prefix}");
        hex::encode(Sha256::digest(identity.as_bytes()))
    }

    /// Look up a live entry, evicting it if the TTL has lapsed.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under `key`, replacing any previous entry.
    pub fn put(&self, key: String, value: String) {
        let mut entries = self.lock();
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries currently held, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

//! Provider registry with atomically swappable snapshots.
//!
//! The registry publishes each provider's descriptor as an `Arc` snapshot.
//! Lookups hand out clones of the current snapshot; model discovery builds a
//! replacement descriptor and swaps it in whole. Readers holding an old
//! snapshot keep a consistent view.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::provider::{Provider, ProviderDescriptor};
use crate::error::{InkwrightError, Result};

/// Registry of provider descriptors.
pub struct ProviderRegistry {
    descriptors: RwLock<HashMap<Provider, Arc<ProviderDescriptor>>>,
}

impl ProviderRegistry {
    /// Create the registry with the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        let descriptors = Provider::ALL
            .iter()
            .map(|p| (*p, Arc::new(ProviderDescriptor::builtin(*p))))
            .collect();
        Self {
            descriptors: RwLock::new(descriptors),
        }
    }

    /// Get the current snapshot for a provider.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` if the provider is not in the registry.
    pub fn get(&self, provider: Provider) -> Result<Arc<ProviderDescriptor>> {
        self.descriptors
            .read()
            .map_err(|_| InkwrightError::Config("provider registry lock poisoned".to_string()))?
            .get(&provider)
            .cloned()
            .ok_or_else(|| InkwrightError::UnknownProvider {
                name: provider.cli_name().to_string(),
            })
    }

    /// List all current snapshots in catalog order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<ProviderDescriptor>> {
        let Ok(guard) = self.descriptors.read() else {
            return Vec::new();
        };
        Provider::ALL
            .iter()
            .filter_map(|p| guard.get(p).cloned())
            .collect()
    }

    /// Publish a new snapshot with a refreshed model list.
    ///
    /// Returns the descriptor that is now current. This is the only mutation
    /// the registry supports besides endpoint overrides at startup.
    pub fn refresh(&self, provider: Provider, models: Vec<String>) -> Result<Arc<ProviderDescriptor>> {
        let current = self.get(provider)?;
        let next = Arc::new(current.with_models(models));
        self.descriptors
            .write()
            .map_err(|_| InkwrightError::Config("provider registry lock poisoned".to_string()))?
            .insert(provider, Arc::clone(&next));
        tracing::debug!(
            provider = provider.cli_name(),
            models = next.models.len(),
            "published refreshed provider snapshot"
        );
        Ok(next)
    }

    /// Publish a new snapshot with an overridden endpoint.
    ///
    /// Applied at startup from `[providers.<name>] endpoint` config entries;
    /// this is also the only way the custom provider gets an endpoint.
    pub fn set_endpoint(&self, provider: Provider, endpoint: Option<String>) -> Result<()> {
        let current = self.get(provider)?;
        let next = Arc::new(current.with_endpoint(endpoint));
        self.descriptors
            .write()
            .map_err(|_| InkwrightError::Config("provider registry lock poisoned".to_string()))?
            .insert(provider, next);
        Ok(())
    }

    /// Publish a replacement model catalog for the custom provider.
    pub fn set_models(&self, provider: Provider, models: Vec<String>) -> Result<()> {
        self.refresh(provider, models).map(|_| ())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_all_providers() {
        let registry = ProviderRegistry::new();
        for provider in Provider::ALL {
            assert!(registry.get(*provider).is_ok());
        }
        assert_eq!(registry.list().len(), Provider::ALL.len());
    }

    #[test]
    fn list_preserves_catalog_order() {
        let registry = ProviderRegistry::new();
        let ids: Vec<Provider> = registry.list().iter().map(|d| d.id).collect();
        assert_eq!(ids, Provider::ALL.to_vec());
    }

    #[test]
    fn refresh_swaps_snapshot_without_mutating_old() {
        let registry = ProviderRegistry::new();
        let before = registry.get(Provider::Ollama).unwrap();
        assert!(before.models.is_empty());

        let after = registry
            .refresh(Provider::Ollama, vec!["llama3.2".to_string()])
            .unwrap();
        assert_eq!(after.models, vec!["llama3.2".to_string()]);

        // The old snapshot is unchanged; the registry serves the new one.
        assert!(before.models.is_empty());
        assert_eq!(registry.get(Provider::Ollama).unwrap().models.len(), 1);
    }

    #[test]
    fn set_endpoint_overrides() {
        let registry = ProviderRegistry::new();
        registry
            .set_endpoint(
                Provider::Custom,
                Some("http://localhost:8080/v1/chat/completions".to_string()),
            )
            .unwrap();
        let descriptor = registry.get(Provider::Custom).unwrap();
        assert_eq!(
            descriptor.endpoint.as_deref(),
            Some("http://localhost:8080/v1/chat/completions")
        );
    }
}

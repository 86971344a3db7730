//! Process-wide provider instance cache.
//!
//! Maps a model identifier to the provider instance serving it. Entries are
//! created on first use and never invalidated; instances hold no discussion
//! state, so one cache can serve concurrent discussions.

use super::openrouter::{OpenRouterClient, OpenRouterProvider};
use roundtable_application::{LlmProvider, ProviderError, ProviderResolver};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

type ProviderFactory =
    Box<dyn Fn(&str) -> Result<Arc<dyn LlmProvider>, ProviderError> + Send + Sync>;

/// Lazily populated model id → provider map implementing [`ProviderResolver`]
pub struct ProviderCache {
    factory: ProviderFactory,
    providers: RwLock<HashMap<String, Arc<dyn LlmProvider>>>,
}

impl ProviderCache {
    /// Cache whose entries are built by `factory` on first request.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn LlmProvider>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Cache serving every model through one OpenRouter client.
    pub fn openrouter(client: OpenRouterClient) -> Self {
        Self::new(move |model| {
            if model.trim().is_empty() {
                return Err(ProviderError::ModelNotAvailable(
                    "empty model identifier".to_string(),
                ));
            }
            Ok(Arc::new(OpenRouterProvider::new(client.clone(), model)) as Arc<dyn LlmProvider>)
        })
    }

    /// Number of instantiated providers.
    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProviderResolver for ProviderCache {
    fn resolve(&self, model: &str) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        if let Some(provider) = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
        {
            return Ok(Arc::clone(provider));
        }

        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot between the two locks
        if let Some(provider) = providers.get(model) {
            return Ok(Arc::clone(provider));
        }

        debug!("Creating provider for model {}", model);
        let provider = (self.factory)(model)?;
        providers.insert(model.to_string(), Arc::clone(&provider));
        Ok(provider)
    }
}

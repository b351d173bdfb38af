//! Lookup of a factory able to process a provider.

use std::sync::Arc;

use store_params::RawParameters;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::factory::{GraphicStore, GraphicStoreFactory};

/// Ordered registry of graphic-store factories.
///
/// Factories are tried in registration order; the first available factory
/// that can process the provider wins.
#[derive(Default, Clone)]
pub struct FactoryFinder {
    factories: Vec<Arc<dyn GraphicStoreFactory>>,
}

impl FactoryFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, factory: Arc<dyn GraphicStoreFactory>) -> &mut Self {
        debug!(factory = %factory.display_name(), "Registered graphic-store factory");
        self.factories.push(factory);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, factory: Arc<dyn GraphicStoreFactory>) -> Self {
        self.register(factory);
        self
    }

    /// Every registered factory, available or not.
    pub fn factories(&self) -> &[Arc<dyn GraphicStoreFactory>] {
        &self.factories
    }

    pub fn available(&self) -> impl Iterator<Item = &Arc<dyn GraphicStoreFactory>> {
        self.factories.iter().filter(|f| f.is_available())
    }

    /// First available factory that can process `provider` with `params`.
    pub fn find(
        &self,
        provider: &Url,
        params: &RawParameters,
    ) -> Option<&Arc<dyn GraphicStoreFactory>> {
        self.available().find(|f| f.can_process(provider, params))
    }

    /// Find a factory and create a store with it.
    pub async fn create(
        &self,
        provider: &Url,
        params: &RawParameters,
    ) -> StoreResult<Arc<dyn GraphicStore>> {
        let Some(factory) = self.find(provider, params) else {
            warn!(
                provider = %provider,
                registered = self.factories.len(),
                "No graphic-store factory can process provider"
            );
            return Err(StoreError::NoFactory(provider.to_string()));
        };

        info!(factory = %factory.display_name(), provider = %provider, "Creating graphic store");
        factory.create_graphic_store(provider, params).await
    }
}

impl std::fmt::Debug for FactoryFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.factories.iter().map(|f| f.display_name()).collect();
        f.debug_struct("FactoryFinder").field("factories", &names).finish()
    }
}

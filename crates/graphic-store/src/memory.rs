//! In-memory graphic store for the `memory:` scheme.
//!
//! Stores are keyed by provider URL and cached by the factory, so two
//! creations for `memory:symbols` share the same graphics.
//!
//! # Parameters
//!
//! | key         | kind     | required | notes                          |
//! |-------------|----------|----------|--------------------------------|
//! | `user`      | text     | yes      |                                |
//! | `password`  | text     | yes      |                                |
//! | `capacity`  | integer  | no       | max graphics held, sample 256  |
//! | `ttl`       | duration | no       | entries expire after this long |
//! | `read_only` | boolean  | no       | reject writes                  |

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use store_params::{ParameterDescriptor, ParameterSet, RawParameters, ResolvedParameters, ValueKind};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::factory::{password_param, username_param, GraphicStore, GraphicStoreFactory};

pub const SCHEME: &str = "memory";
pub const CAPACITY: &str = "capacity";
pub const TTL: &str = "ttl";
pub const READ_ONLY: &str = "read_only";

/// Capacity used when `capacity` is absent.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug)]
struct Entry {
    data: Arc<[u8]>,
    stored_at: Instant,
}

/// A graphic store holding named graphics in memory.
#[derive(Debug)]
pub struct MemoryGraphicStore {
    provider: Url,
    display_name: String,
    parameters: ResolvedParameters,
    capacity: usize,
    ttl: Option<Duration>,
    read_only: bool,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryGraphicStore {
    fn from_parameters(provider: &Url, parameters: ResolvedParameters) -> StoreResult<Self> {
        let capacity = match parameters.get::<i64>(CAPACITY) {
            None => DEFAULT_CAPACITY,
            Some(n) if n > 0 => usize::try_from(n).map_err(|_| StoreError::InvalidParameter {
                key: CAPACITY.to_string(),
                message: format!("{n} is too large"),
            })?,
            Some(n) => {
                return Err(StoreError::InvalidParameter {
                    key: CAPACITY.to_string(),
                    message: format!("must be positive, got {n}"),
                })
            }
        };

        let ttl = parameters.get::<Duration>(TTL).filter(|d| !d.is_zero());
        let read_only = parameters.get::<bool>(READ_ONLY).unwrap_or(false);

        Ok(Self {
            provider: provider.clone(),
            display_name: format!("Memory store ({})", provider.path()),
            parameters,
            capacity,
            ttl,
            read_only,
            entries: RwLock::new(HashMap::new()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Store a graphic under `name`, replacing any previous one.
    pub async fn put(&self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly(self.provider.to_string()));
        }

        let name = name.into();
        let mut entries = self.entries.write().await;
        self.evict_expired(&mut entries);

        if !entries.contains_key(&name) && entries.len() >= self.capacity {
            return Err(StoreError::StoreFull {
                provider: self.provider.to_string(),
                capacity: self.capacity,
            });
        }

        entries.insert(
            name,
            Entry {
                data: data.into(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Graphic stored under `name`, unless missing or expired.
    pub async fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        let entries = self.entries.read().await;
        entries
            .get(name)
            .filter(|e| !self.is_expired(e))
            .map(|e| e.data.clone())
    }

    /// Names of live graphics, sorted.
    pub async fn names(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut names: Vec<String> = entries
            .iter()
            .filter(|(_, e)| !self.is_expired(e))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !self.is_expired(e)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .map(|ttl| entry.stored_at.elapsed() > ttl)
            .unwrap_or(false)
    }

    fn evict_expired(&self, entries: &mut HashMap<String, Entry>) {
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(e));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(provider = %self.provider, evicted, "Evicted expired graphics");
        }
    }
}

impl GraphicStore for MemoryGraphicStore {
    fn provider(&self) -> &Url {
        &self.provider
    }

    fn parameters(&self) -> &ResolvedParameters {
        &self.parameters
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Factory for [`MemoryGraphicStore`]s.
pub struct MemoryStoreFactory {
    parameters: ParameterSet,
    stores: RwLock<HashMap<Url, Arc<MemoryGraphicStore>>>,
}

impl MemoryStoreFactory {
    pub fn new() -> StoreResult<Self> {
        let parameters = ParameterSet::builder()
            .name("memory")
            .param(username_param())
            .param(password_param())
            .param(
                ParameterDescriptor::of(CAPACITY, ValueKind::Integer)
                    .with_description("Maximum number of graphics held")
                    .with_sample(DEFAULT_CAPACITY as i64)
                    .optional(),
            )
            .param(
                ParameterDescriptor::of(TTL, ValueKind::Duration)
                    .with_description("Time after which stored graphics expire")
                    .optional(),
            )
            .param(
                ParameterDescriptor::of(READ_ONLY, ValueKind::Boolean)
                    .with_description("Reject writes")
                    .optional(),
            )
            .build()?;

        Ok(Self {
            parameters,
            stores: RwLock::new(HashMap::new()),
        })
    }

    /// Create a store, keeping the concrete type.
    ///
    /// Parameters are validated on every call, including calls that return
    /// a cached store.
    pub async fn open(
        &self,
        provider: &Url,
        params: &RawParameters,
    ) -> StoreResult<Arc<MemoryGraphicStore>> {
        if !self.accepts_scheme(provider.scheme()) {
            return Err(StoreError::UnsupportedProvider(provider.to_string()));
        }

        let resolved = self.parameters.resolve(params)?;

        if let Some(store) = self.stores.read().await.get(provider) {
            debug!(provider = %provider, "Returning cached memory store");
            return Ok(store.clone());
        }

        let mut stores = self.stores.write().await;
        // Another caller may have created it since the read lock was released.
        if let Some(store) = stores.get(provider) {
            return Ok(store.clone());
        }

        let store = Arc::new(MemoryGraphicStore::from_parameters(provider, resolved)?);
        info!(
            provider = %provider,
            capacity = store.capacity(),
            read_only = store.is_read_only(),
            "Created memory store"
        );
        stores.insert(provider.clone(), store.clone());
        Ok(store)
    }

    /// Number of cached stores.
    pub async fn cached(&self) -> usize {
        self.stores.read().await.len()
    }
}

#[async_trait]
impl GraphicStoreFactory for MemoryStoreFactory {
    fn display_name(&self) -> &str {
        "Memory"
    }

    fn description(&self) -> &str {
        "Graphics held in process memory"
    }

    fn parameters_info(&self) -> &ParameterSet {
        &self.parameters
    }

    fn accepts_scheme(&self, scheme: &str) -> bool {
        scheme.eq_ignore_ascii_case(SCHEME)
    }

    async fn create_graphic_store(
        &self,
        provider: &Url,
        params: &RawParameters,
    ) -> StoreResult<Arc<dyn GraphicStore>> {
        let store: Arc<dyn GraphicStore> = self.open(provider, params).await?;
        Ok(store)
    }
}

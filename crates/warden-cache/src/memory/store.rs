//! In-memory session store using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::{debug, warn};

use warden_core::config::cache::MemoryCacheConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::SessionStore;

/// Stored value alongside the TTL it was written with.
type Entry = (String, Duration);

/// Expires each entry after the TTL given at write time.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// In-memory session store provider using moka.
///
/// Suitable for tests and single-node deployments; state does not survive a
/// restart and is not shared between processes.
///
/// The cache has no size bound: entries leave only by expiry or deletion.
/// `max_capacity` is enforced at write time instead. Once full, writes of
/// new keys fail while existing keys can still be overwritten.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
    /// Live entries allowed before new keys are refused.
    max_capacity: u64,
}

impl MemoryCacheProvider {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder().expire_after(PerEntryTtl).build();

        Self {
            cache,
            max_capacity: config.max_capacity,
        }
    }

    /// Whether a write to `key` fits under the capacity limit.
    async fn admits(&self, key: &str) -> bool {
        if self.cache.contains_key(key) {
            return true;
        }
        // Flush pending inserts and expirations so the count is current.
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() < self.max_capacity
    }
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

#[async_trait]
impl SessionStore for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|(value, _)| value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if !self.admits(key).await {
            warn!(max_capacity = self.max_capacity, "Session store full, refusing write");
            return Err(AppError::service_unavailable("Session store is full"));
        }
        self.cache
            .insert(key.to_string(), (value.to_string(), ttl))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        let taken = self.cache.remove(key).await.map(|(value, _)| value);
        debug!(found = taken.is_some(), "Took key");
        Ok(taken)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

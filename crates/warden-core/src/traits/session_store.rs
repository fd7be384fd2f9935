//! Key/value session store trait for refresh-token bookkeeping.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Durable, TTL-keyed string store backing refresh records and session
/// pointers (Redis in production, moka in-process for tests and single-node
/// deployments).
///
/// Implementations are responsible for key prefixing and TTL enforcement.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, overwriting any existing value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Atomically read and delete a key.
    ///
    /// Of several concurrent callers for the same key, at most one observes
    /// `Some`.
    async fn take(&self, key: &str) -> AppResult<Option<String>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

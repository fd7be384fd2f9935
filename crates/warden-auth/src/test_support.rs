//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use warden_cache::memory::MemoryCacheProvider;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::{PolicyRuleSource, SessionStore, UserCredentialSource};
use warden_core::types::{PolicyRule, UserCredentials, UserIdentity};

use crate::session::SessionManager;
use crate::token::{JwtDecoder, JwtEncoder, TokenKeys};

pub const ISSUER: &str = "warden-test";

pub const PRIVATE_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/ed25519_private.pem"
));
pub const PUBLIC_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/ed25519_public.pem"
));
const OTHER_PRIVATE_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/ed25519_other_private.pem"
));
const OTHER_PUBLIC_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../testdata/ed25519_other_public.pem"
));

pub fn keys() -> TokenKeys {
    TokenKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).unwrap()
}

pub fn other_keys() -> TokenKeys {
    TokenKeys::from_pem(OTHER_PRIVATE_PEM.as_bytes(), OTHER_PUBLIC_PEM.as_bytes()).unwrap()
}

pub fn session_manager_with(store: Arc<dyn SessionStore>, refresh_ttl: Duration) -> SessionManager {
    let keys = keys();
    SessionManager::new(
        JwtEncoder::new(&keys, ISSUER, Duration::from_secs(900)),
        JwtDecoder::new(&keys, ISSUER, 0),
        store,
        refresh_ttl,
    )
}

pub fn session_manager() -> (SessionManager, Arc<MemoryCacheProvider>) {
    let store = Arc::new(MemoryCacheProvider::default());
    let manager = session_manager_with(store.clone(), Duration::from_secs(3600));
    (manager, store)
}

/// Rule source whose contents and availability can be changed mid-test.
#[derive(Debug, Default)]
pub struct StaticRuleSource {
    rules: Mutex<Vec<PolicyRule>>,
    failing: AtomicBool,
}

impl StaticRuleSource {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
            failing: AtomicBool::new(false),
        }
    }

    pub async fn replace(&self, rules: Vec<PolicyRule>) {
        *self.rules.lock().await = rules;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PolicyRuleSource for StaticRuleSource {
    async fn policy_rules(&self) -> AppResult<Vec<PolicyRule>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("rule source offline"));
        }
        Ok(self.rules.lock().await.clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.failing.load(Ordering::SeqCst))
    }
}

/// In-memory user table keyed by email.
#[derive(Debug, Default)]
pub struct StaticUserSource {
    users: StdMutex<HashMap<String, UserCredentials>>,
    failing: AtomicBool,
}

impl StaticUserSource {
    pub fn insert(&self, email: &str, identity: UserIdentity, password_hash: &str) {
        self.users
            .lock()
            .unwrap()
            .insert(email.to_string(), UserCredentials::new(identity, password_hash));
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserCredentialSource for StaticUserSource {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("user store offline"));
        }
        Ok(self.users.lock().unwrap().get(email).cloned())
    }
}

/// Session store that delegates to memory but can be made to fail writes or deletes.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryCacheProvider,
    pub fail_set: AtomicBool,
    pub fail_delete: AtomicBool,
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(AppError::internal("store write refused"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::internal("store delete refused"));
        }
        self.inner.delete(key).await
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.take(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

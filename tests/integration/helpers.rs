//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tower::ServiceExt;

use warden_auth::{
    CredentialVerifier, JwtDecoder, JwtEncoder, PasswordHasher, PolicyEnforcer, PolicyReloader,
    SessionManager, TokenKeys,
};
use warden_cache::CacheManager;
use warden_cache::memory::MemoryCacheProvider;
use warden_core::config::AppConfig;
use warden_core::result::AppResult;
use warden_core::traits::{PolicyRuleSource, UserCredentialSource};
use warden_core::types::{PolicyRule, UserCredentials, UserIdentity};

const PRIVATE_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/ed25519_private.pem"
));
const PUBLIC_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/ed25519_public.pem"
));

/// Role allowed to administer policy.
pub const ADMIN_ROLE: u64 = 1;
/// Role allowed only to read its own identity.
pub const MEMBER_ROLE: u64 = 2;
/// Role with no rules at all.
pub const GUEST_ROLE: u64 = 3;

/// Seeded login account, a member.
pub const MEMBER_EMAIL: &str = "member@example.com";
pub const MEMBER_PASSWORD: &str = "correct horse battery staple";
pub const MEMBER_USER_ID: u64 = 42;

/// Rule source the tests can rewrite between reloads.
#[derive(Debug)]
pub struct TestRules {
    rules: Mutex<Vec<PolicyRule>>,
    healthy: AtomicBool,
}

impl Default for TestRules {
    fn default() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl TestRules {
    pub async fn replace(&self, rules: Vec<PolicyRule>) {
        *self.rules.lock().await = rules;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl PolicyRuleSource for TestRules {
    async fn policy_rules(&self) -> AppResult<Vec<PolicyRule>> {
        Ok(self.rules.lock().await.clone())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

/// User table keyed by email.
#[derive(Debug, Default)]
pub struct TestUsers {
    users: HashMap<String, UserCredentials>,
}

#[async_trait]
impl UserCredentialSource for TestUsers {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(self.users.get(email).cloned())
    }
}

fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(256, 1, 1).expect("argon2 params")
}

fn seeded_users() -> TestUsers {
    let hash = cheap_hasher()
        .hash_password(MEMBER_PASSWORD)
        .expect("hash seeded password");
    let mut users = HashMap::new();
    users.insert(
        MEMBER_EMAIL.to_string(),
        UserCredentials::new(UserIdentity::new(MEMBER_USER_ID, MEMBER_ROLE), hash),
    );
    TestUsers { users }
}

pub fn default_rules() -> Vec<PolicyRule> {
    vec![
        PolicyRule::new(ADMIN_ROLE, "/v1/me", "GET"),
        PolicyRule::new(ADMIN_ROLE, "/v1/policy", "GET"),
        PolicyRule::new(ADMIN_ROLE, "/v1/policy/reload", "POST"),
        PolicyRule::new(MEMBER_ROLE, "/v1/me", "GET"),
    ]
}

/// Decoded test response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<SessionManager>,
    pub enforcer: Arc<PolicyEnforcer>,
    pub rules: Arc<TestRules>,
    _shutdown: watch::Sender<bool>,
}

impl TestApp {
    /// Create a new test application with dev login enabled
    pub async fn new() -> Self {
        Self::with_dev_login(true).await
    }

    pub async fn with_dev_login(enabled: bool) -> Self {
        let mut config = AppConfig::default();
        config.app.service_name = "warden-it".to_string();
        config.auth.dev_login_enabled = enabled;

        let keys = TokenKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
            .expect("test keys");
        let store = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::default(),
        )));
        let sessions = Arc::new(SessionManager::new(
            JwtEncoder::new(&keys, "warden-it", config.auth.access_ttl()),
            JwtDecoder::new(&keys, "warden-it", 0),
            store,
            config.auth.refresh_ttl(),
        ));

        let rules = Arc::new(TestRules::default());
        rules.replace(default_rules()).await;
        let enforcer = Arc::new(PolicyEnforcer::new(rules.clone()));
        enforcer.load_policy().await.expect("initial policy load");

        let credentials = CredentialVerifier::new(Arc::new(seeded_users()), cheap_hasher())
            .expect("credential verifier");

        let (shutdown, shutdown_rx) = watch::channel(false);
        let (reloader, _handle) = PolicyReloader::spawn(enforcer.clone(), 4, shutdown_rx);

        let state = warden_api::AppState::new(
            Arc::new(config),
            sessions.clone(),
            credentials,
            enforcer.clone(),
            reloader,
        );

        Self {
            router: warden_api::build_router(state),
            sessions,
            enforcer,
            rules,
            _shutdown: shutdown,
        }
    }

    /// Signs an access token directly, bypassing the HTTP login
    pub fn token_for(&self, user_id: u64, role_id: u64) -> String {
        self.sessions
            .sign_access(UserIdentity::new(user_id, role_id))
            .expect("sign access token")
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    /// Send a prepared request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Logs in through the dev endpoint and returns `(access, refresh)`
    pub async fn dev_login(&self, user_id: u64, role_id: u64) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/v1/auth/login-dev",
                Some(serde_json::json!({ "user_id": user_id, "role_id": role_id })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        let data = &response.body["data"];
        (
            data["access_token"].as_str().expect("access_token").to_string(),
            data["refresh_token"].as_str().expect("refresh_token").to_string(),
        )
    }

    /// Polls until the enforcer reaches `generation`
    pub async fn wait_for_generation(&self, generation: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.enforcer.generation() < generation {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("policy reload did not complete");
    }
}

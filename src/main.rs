//! Warden Server — session and access-control service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use warden_auth::{
    CredentialVerifier, JwtDecoder, JwtEncoder, PasswordHasher, PolicyEnforcer, PolicyReloader,
    SessionManager, TokenKeys,
};
use warden_cache::CacheManager;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::{PolicyRuleSource, SessionStore, UserCredentialSource};
use warden_core::types::{PolicyRule, UserCredentials};
use warden_database::{DatabasePool, RbacRepository, UserRepository};

#[tokio::main]
async fn main() {
    let env = std::env::var("WARDEN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Stand-in for the database when none is configured: no rules, so every
/// gated request is denied, and no users, so every login fails.
#[derive(Debug)]
struct NoDatabase;

#[async_trait]
impl PolicyRuleSource for NoDatabase {
    async fn policy_rules(&self) -> AppResult<Vec<PolicyRule>> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl UserCredentialSource for NoDatabase {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(None)
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        env = %config.app.env,
        "Starting Warden v{}",
        env!("CARGO_PKG_VERSION")
    );

    // ── Step 1: Signing keys ─────────────────────────────────────
    let keys = TokenKeys::from_config(&config.auth)?;

    // ── Step 2: Session store ────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing session store");
    let store: Arc<dyn SessionStore> = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Policy rules and user credentials ────────────────
    let (db, source, users): (
        Option<DatabasePool>,
        Arc<dyn PolicyRuleSource>,
        Arc<dyn UserCredentialSource>,
    ) = if config.database.url.is_empty() {
        tracing::warn!(
            "database.url is empty; policy has no rules and password login rejects everyone"
        );
        let source: Arc<dyn PolicyRuleSource> = Arc::new(NoDatabase);
        let users: Arc<dyn UserCredentialSource> = Arc::new(NoDatabase);
        (None, source, users)
    } else {
        tracing::info!("Connecting to database...");
        let db = DatabasePool::connect(&config.database).await?;
        warden_database::migration::run_migrations(db.pool()).await?;
        let source: Arc<dyn PolicyRuleSource> = Arc::new(RbacRepository::new(db.clone()));
        let users: Arc<dyn UserCredentialSource> = Arc::new(UserRepository::new(db.clone()));
        (Some(db), source, users)
    };

    // ── Step 4: Token lifecycle ──────────────────────────────────
    let issuer = config.app.service_name.clone();
    let sessions = Arc::new(SessionManager::new(
        JwtEncoder::new(&keys, issuer.clone(), config.auth.access_ttl()),
        JwtDecoder::new(&keys, &issuer, config.auth.leeway_seconds),
        store,
        config.auth.refresh_ttl(),
    ));
    let credentials = CredentialVerifier::new(users, PasswordHasher::from_config(&config.auth)?)?;

    // ── Step 5: Policy enforcement ───────────────────────────────
    let enforcer = Arc::new(PolicyEnforcer::new(source));
    if config.policy.load_on_startup {
        enforcer.load_policy().await?;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (reloader, reload_handle) =
        PolicyReloader::spawn(enforcer.clone(), config.policy.reload_queue_size, shutdown_rx);

    // ── Step 6: HTTP server ──────────────────────────────────────
    let config = Arc::new(config);
    let state = warden_api::AppState::new(config.clone(), sessions, credentials, enforcer, reloader);
    let app = warden_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Warden server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Waiting for background tasks to complete...");
    let grace = Duration::from_secs(config.server.shutdown_timeout_seconds);
    if tokio::time::timeout(grace, reload_handle).await.is_err() {
        tracing::warn!("Policy reload worker did not stop in time");
    }

    if let Some(db) = db {
        db.close().await;
    }

    tracing::info!("Warden server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

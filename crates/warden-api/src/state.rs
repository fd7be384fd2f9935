//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warden_auth::{CredentialVerifier, PolicyEnforcer, PolicyReloader, RequestGate, SessionManager};
use warden_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Access token signing and refresh session lifecycle
    pub sessions: Arc<SessionManager>,
    /// Email and password check for login
    pub credentials: CredentialVerifier,
    /// Policy model
    pub enforcer: Arc<PolicyEnforcer>,
    /// Authentication followed by authorization
    pub gate: RequestGate,
    /// Background policy reload queue
    pub reloader: PolicyReloader,
}

impl AppState {
    /// Builds the state; the gate is derived from `sessions` and `enforcer`.
    pub fn new(
        config: Arc<AppConfig>,
        sessions: Arc<SessionManager>,
        credentials: CredentialVerifier,
        enforcer: Arc<PolicyEnforcer>,
        reloader: PolicyReloader,
    ) -> Self {
        let gate = RequestGate::new(sessions.clone(), enforcer.clone());
        Self {
            config,
            sessions,
            credentials,
            enforcer,
            gate,
            reloader,
        }
    }
}

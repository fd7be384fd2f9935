//! Route definitions for the Warden HTTP API.
//!
//! Token endpoints and health checks are public. Every other `/v1` route sits
//! behind the request gate.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/me", get(handlers::me::me))
        .route("/v1/policy", get(handlers::policy::status))
        .route("/v1/policy/reload", post(handlers::policy::reload))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(auth_routes(&state))
        .merge(health_routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Token endpoints: login, refresh, logout, and dev login when enabled
fn auth_routes(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/v1/auth/login", post(handlers::auth::login))
        .route("/v1/auth/refresh", post(handlers::auth::refresh))
        .route("/v1/auth/logout", post(handlers::auth::logout));

    if state.config.auth.dev_login_enabled {
        router.route("/v1/auth/login-dev", post(handlers::auth::dev_login))
    } else {
        router
    }
}

/// Liveness and readiness checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/livez", get(handlers::health::livez))
        .route("/readyz", get(handlers::health::readyz))
}

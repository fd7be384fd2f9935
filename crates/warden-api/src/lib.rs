//! # warden-api
//!
//! HTTP API layer for Warden built on Axum.
//!
//! Provides the token endpoints, the request gate middleware that guards
//! every `/v1` route, the `AuthUser` extractor, health checks, and the
//! mapping from `AppError` to HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

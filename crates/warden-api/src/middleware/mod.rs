//! Axum middleware stack.

pub mod auth;

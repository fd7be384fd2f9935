//! # warden-core
//!
//! Core crate for Warden. Contains the collaborator traits consumed by the
//! session and access-control core, configuration schemas, shared types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

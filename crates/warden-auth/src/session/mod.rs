//! Refresh session lifecycle: issuance, rotation, revocation, reuse detection.

pub mod manager;
pub mod token;

pub use manager::{SessionManager, TokenPair};
pub use token::generate_refresh_token;

//! # warden-auth
//!
//! Session and access-control core for Warden.
//!
//! ## Modules
//!
//! - `token` — Ed25519-signed access token creation and verification
//! - `session` — Refresh token issuance, rotation, revocation, and reuse detection
//! - `rbac` — In-memory policy model, enforcement, and background reloads
//! - `password` — Argon2id password hashing and email/password login checks
//! - `gate` — Per-request authentication followed by authorization

pub mod gate;
pub mod password;
pub mod rbac;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use gate::RequestGate;
pub use password::{CredentialVerifier, PasswordHasher};
pub use rbac::{AccessRequest, ExactMatchEngine, PolicyEnforcer, PolicyReloader, RuleEngine};
pub use session::{SessionManager, TokenPair};
pub use token::{AccessClaims, JwtDecoder, JwtEncoder, TokenKeys};

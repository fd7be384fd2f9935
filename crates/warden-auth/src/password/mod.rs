//! Password hashing and login credential checks.

pub mod hasher;
pub mod verifier;

pub use hasher::PasswordHasher;
pub use verifier::CredentialVerifier;

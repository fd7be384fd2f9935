//! Email and password login check.

use std::sync::Arc;

use tracing::{error, info, warn};

use warden_core::error::{AppError, ErrorKind};
use warden_core::traits::UserCredentialSource;
use warden_core::types::UserIdentity;

use super::hasher::PasswordHasher;
use crate::session::generate_refresh_token;

/// Resolves an email and password to the identity a session is issued for.
///
/// Unknown emails are checked against a throwaway hash so they cost the same
/// as a wrong password.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserCredentialSource>,
    hasher: PasswordHasher,
    decoy_hash: Arc<str>,
}

impl CredentialVerifier {
    /// Creates a verifier. Hashes one random password up front.
    pub fn new(users: Arc<dyn UserCredentialSource>, hasher: PasswordHasher) -> Result<Self, AppError> {
        let decoy_hash = hasher.hash_password(&generate_refresh_token())?;
        Ok(Self {
            users,
            hasher,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Checks `password` against the stored hash for `email`.
    ///
    /// Every credential failure is `Unauthorized` with the same message. A
    /// lookup failure in the user store propagates unchanged.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserIdentity, AppError> {
        let found = self.users.find_by_email(email).await?;

        let hash: Arc<str> = match &found {
            Some(creds) => creds.password_hash.as_str().into(),
            None => self.decoy_hash.clone(),
        };
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let verdict = tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Password check did not complete", e))?;

        let Some(creds) = found else {
            warn!("Login rejected: unknown email");
            return Err(rejected());
        };
        let user_id = creds.identity.user_id;

        match verdict {
            Ok(true) => {
                info!(user_id, role_id = creds.identity.role_id, "Login succeeded");
                Ok(creds.identity)
            }
            Ok(false) => {
                warn!(user_id, "Login rejected: password mismatch");
                Err(rejected())
            }
            Err(e) => {
                error!(user_id, error = %e, "Stored password hash is unusable");
                Err(rejected())
            }
        }
    }
}

fn rejected() -> AppError {
    AppError::unauthorized("Invalid email or password")
}

//! Token lifecycle manager: access signing and refresh rotation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use warden_cache::keys;
use warden_core::error::{AppError, ErrorKind};
use warden_core::traits::SessionStore;
use warden_core::types::UserIdentity;

use crate::token::{AccessClaims, JwtDecoder, JwtEncoder};

use super::token::generate_refresh_token;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues, validates, rotates, and revokes credentials.
///
/// Holds no mutable state of its own; every refresh record and session
/// pointer lives in the [`SessionStore`], so instances are freely shared
/// across request handlers.
#[derive(Clone)]
pub struct SessionManager {
    /// Access token signer.
    encoder: Arc<JwtEncoder>,
    /// Access token verifier.
    decoder: Arc<JwtDecoder>,
    /// Refresh record and session pointer storage.
    store: Arc<dyn SessionStore>,
    /// Lifetime of refresh records and session pointers.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("encoder", &self.encoder)
            .field("store", &self.store)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new manager.
    pub fn new(
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        store: Arc<dyn SessionStore>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            encoder: Arc::new(encoder),
            decoder: Arc::new(decoder),
            store,
            refresh_ttl,
        }
    }

    /// The session store backing this manager.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Signs an access token for `identity`.
    pub fn sign_access(&self, identity: UserIdentity) -> Result<String, AppError> {
        self.encoder.sign_access(identity)
    }

    /// Verifies an access token and returns its claims.
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        self.decoder.parse_access(token)
    }

    /// Issues a new refresh token for `identity`.
    ///
    /// Writes the refresh record, then points the user's session at the new
    /// token. Any refresh token the user held before becomes stale. If the
    /// pointer cannot be written the new record is removed again.
    pub async fn issue_refresh(&self, identity: UserIdentity) -> Result<String, AppError> {
        let token = generate_refresh_token();
        let record_key = keys::refresh_token(&token);

        self.store
            .set(&record_key, &identity.to_string(), self.refresh_ttl)
            .await
            .map_err(|e| store_failure("Failed to store refresh token", e))?;

        if let Err(e) = self
            .store
            .set(
                &keys::refresh_session(identity.user_id),
                &token,
                self.refresh_ttl,
            )
            .await
        {
            if let Err(cleanup) = self.store.delete(&record_key).await {
                warn!(user_id = identity.user_id, error = %cleanup, "Failed to remove unpointed refresh token");
            }
            return Err(store_failure("Failed to store refresh session", e));
        }

        debug!(user_id = identity.user_id, "Issued refresh token");
        Ok(token)
    }

    /// Issues a signed access token and a new refresh token for `identity`.
    pub async fn issue_pair(&self, identity: UserIdentity) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let access_token = self.encoder.sign_access_at(identity, now)?;
        let refresh_token = self.issue_refresh(identity).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: expires_at(now, self.encoder.access_ttl()),
            refresh_expires_at: expires_at(now, self.refresh_ttl),
        })
    }

    /// Returns the identity a refresh token was issued to.
    ///
    /// A token that is still recorded but is no longer the user's current
    /// one has been superseded, which means it was leaked or replayed. Its
    /// record is deleted and the call fails as `Unauthorized`.
    pub async fn validate_refresh(&self, token: &str) -> Result<UserIdentity, AppError> {
        let record_key = keys::refresh_token(token);

        let payload = self
            .store
            .get(&record_key)
            .await?
            .ok_or_else(|| AppError::unauthorized("Refresh token is invalid or expired"))?;

        let identity: UserIdentity = payload.parse()?;

        let current = self
            .store
            .get(&keys::refresh_session(identity.user_id))
            .await?;

        if current.as_deref() != Some(token) {
            warn!(
                user_id = identity.user_id,
                role_id = identity.role_id,
                "Refresh token reuse detected, revoking"
            );
            if let Err(e) = self.store.delete(&record_key).await {
                warn!(user_id = identity.user_id, error = %e, "Failed to revoke reused refresh token");
            }
            return Err(AppError::unauthorized("Refresh token has been superseded"));
        }

        Ok(identity)
    }

    /// Exchanges a valid refresh token for a new pair, consuming the old one.
    ///
    /// The old record is claimed atomically before anything is issued, so of
    /// several concurrent refreshes with the same token exactly one succeeds.
    pub async fn refresh(&self, old_token: &str) -> Result<TokenPair, AppError> {
        let identity = self.validate_refresh(old_token).await?;

        if self
            .store
            .take(&keys::refresh_token(old_token))
            .await?
            .is_none()
        {
            warn!(
                user_id = identity.user_id,
                "Refresh token consumed by a concurrent request"
            );
            return Err(AppError::unauthorized("Refresh token has already been used"));
        }

        let pair = self.issue_pair(identity).await?;
        info!(
            user_id = identity.user_id,
            role_id = identity.role_id,
            "Refresh token rotated"
        );
        Ok(pair)
    }

    /// Deletes the refresh record for `token`. Revoking an unknown token is a no-op.
    pub async fn revoke_refresh(&self, token: &str) -> Result<(), AppError> {
        self.store
            .delete(&keys::refresh_token(token))
            .await
            .map_err(|e| store_failure("Failed to revoke refresh token", e))
    }
}

fn store_failure(message: &str, err: AppError) -> AppError {
    AppError::with_source(ErrorKind::Internal, message, err)
}

fn expires_at(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

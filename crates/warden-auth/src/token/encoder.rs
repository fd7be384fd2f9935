//! Access token creation with Ed25519 signing and configurable TTL.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use warden_core::error::{AppError, ErrorKind};
use warden_core::types::UserIdentity;

use super::claims::AccessClaims;
use super::keys::TokenKeys;

/// Creates signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// Ed25519 private key.
    encoding_key: EncodingKey,
    /// Value of the `iss` claim.
    issuer: String,
    /// Access token lifetime.
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder signing as `issuer`.
    pub fn new(keys: &TokenKeys, issuer: impl Into<String>, access_ttl: Duration) -> Self {
        Self {
            encoding_key: keys.encoding_key().clone(),
            issuer: issuer.into(),
            access_ttl,
        }
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Signs an access token for `identity`, valid from now.
    pub fn sign_access(&self, identity: UserIdentity) -> Result<String, AppError> {
        self.sign_access_at(identity, Utc::now())
    }

    /// Signs an access token as if issued at `now`.
    ///
    /// `iat` and `nbf` are both `now`; `exp` is `now + access_ttl`.
    pub fn sign_access_at(
        &self,
        identity: UserIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let ttl = chrono::Duration::from_std(self.access_ttl)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Access TTL out of range", e))?;
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal("Access token expiry out of range"))?;
        let issued = now.timestamp();

        let claims = AccessClaims {
            sub: identity.user_id.to_string(),
            role_id: identity.role_id,
            iss: self.issuer.clone(),
            iat: issued,
            nbf: issued,
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign access token", e)
        })
    }
}

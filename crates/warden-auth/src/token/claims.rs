//! Claims carried by every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::error::AppError;
use warden_core::types::UserIdentity;

/// Access token payload. Immutable once signed and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user ID in decimal.
    pub sub: String,
    /// The user's role, serialized as a string.
    #[serde(with = "role_id_string")]
    pub role_id: u64,
    /// Issuer: the service name.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Returns the user ID parsed from the subject claim.
    pub fn user_id(&self) -> Result<u64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Token subject is not a user id"))
    }

    /// Returns the (user, role) identity this token proves.
    pub fn identity(&self) -> Result<UserIdentity, AppError> {
        Ok(UserIdentity::new(self.user_id()?, self.role_id))
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Role ids travel as strings so that JavaScript clients keep full precision.
mod role_id_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
            Raw::Number(n) => Ok(n),
        }
    }
}

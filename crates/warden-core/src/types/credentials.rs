//! Stored login credentials.

use std::fmt;

use super::identity::UserIdentity;

/// What a credential lookup returns for a known login: the identity to
/// issue tokens for and the stored password hash to check against.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Identity the session is issued to.
    pub identity: UserIdentity,
    /// PHC-format password hash.
    pub password_hash: String,
}

impl UserCredentials {
    /// Create a new credential record.
    pub fn new(identity: UserIdentity, password_hash: impl Into<String>) -> Self {
        Self {
            identity,
            password_hash: password_hash.into(),
        }
    }
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("identity", &self.identity)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

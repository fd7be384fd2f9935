//! Authenticated identity attached to a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The (user, role) pair an authenticated request acts as.
///
/// Also the payload stored against a refresh token, rendered as
/// `"{user_id}:{role_id}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    /// User identifier.
    pub user_id: u64,
    /// The user's single role.
    pub role_id: u64,
}

impl UserIdentity {
    /// Create a new identity.
    pub fn new(user_id: u64, role_id: u64) -> Self {
        Self { user_id, role_id }
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.role_id)
    }
}

impl FromStr for UserIdentity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, role) = s
            .split_once(':')
            .ok_or_else(|| AppError::internal(format!("Malformed session payload '{s}'")))?;

        let user_id = user
            .parse()
            .map_err(|_| AppError::internal(format!("Malformed user id in session payload '{s}'")))?;
        let role_id = role
            .parse()
            .map_err(|_| AppError::internal(format!("Malformed role id in session payload '{s}'")))?;

        Ok(Self { user_id, role_id })
    }
}

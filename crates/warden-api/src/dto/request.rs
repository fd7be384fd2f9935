//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Email and password login.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, max = 1024, message = "password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential-less login for local development.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DevLoginRequest {
    /// User to log in as.
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: u64,
    /// Role to act as.
    #[validate(range(min = 1, message = "role_id must be positive"))]
    pub role_id: u64,
}

//! User credential lookup trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserCredentials;

/// Looks up the stored credentials behind a login email.
#[async_trait]
pub trait UserCredentialSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the credentials for `email`, or `None` when no user with a
    /// role has that email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>>;
}

//! User repository: login credentials and role membership.

use async_trait::async_trait;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::UserCredentialSource;
use warden_core::types::{UserCredentials, UserIdentity};

use crate::connection::DatabasePool;

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    user_id: i64,
    role_id: i64,
    password_hash: String,
}

impl CredentialRow {
    fn into_credentials(self) -> AppResult<UserCredentials> {
        let user_id = u64::try_from(self.user_id)
            .map_err(|_| AppError::internal(format!("Negative user id {}", self.user_id)))?;
        let role_id = u64::try_from(self.role_id)
            .map_err(|_| AppError::internal(format!("Negative role id {}", self.role_id)))?;
        Ok(UserCredentials::new(
            UserIdentity::new(user_id, role_id),
            self.password_hash,
        ))
    }
}

/// Reads users joined with their role.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabasePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCredentialSource for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        sqlx::query_as::<_, CredentialRow>(
            "SELECT u.id AS user_id, ur.role_id, u.password_hash \
             FROM users u \
             JOIN user_role ur ON ur.user_id = u.id \
             WHERE u.email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to look up user", e))?
        .map(CredentialRow::into_credentials)
        .transpose()
    }
}

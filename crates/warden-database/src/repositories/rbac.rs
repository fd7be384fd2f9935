//! RBAC repository: the durable source of policy rules.

use async_trait::async_trait;
use tracing::debug;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::PolicyRuleSource;
use warden_core::types::PolicyRule;

use crate::connection::DatabasePool;

/// `permission.type` value marking an API permission.
pub const PERMISSION_TYPE_API: i16 = 3;

/// Raw row of the role/permission join.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PolicyRuleRow {
    role_id: i64,
    path: String,
    method: String,
}

impl PolicyRuleRow {
    fn into_rule(self) -> Result<PolicyRule, AppError> {
        let role_id = u64::try_from(self.role_id)
            .map_err(|_| AppError::internal(format!("Negative role id {}", self.role_id)))?;
        Ok(PolicyRule::new(role_id, self.path, self.method))
    }
}

/// Repository reading role/permission associations.
#[derive(Debug, Clone)]
pub struct RbacRepository {
    db: DatabasePool,
}

impl RbacRepository {
    /// Create a new RBAC repository.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PolicyRuleSource for RbacRepository {
    async fn policy_rules(&self) -> AppResult<Vec<PolicyRule>> {
        let rows = sqlx::query_as::<_, PolicyRuleRow>(
            "SELECT r.id AS role_id, p.http_path AS path, p.http_method AS method \
             FROM role_permission rp \
             JOIN role r ON rp.role_id = r.id \
             JOIN permission p ON rp.permission_id = p.id \
             WHERE p.type = $1",
        )
        .bind(PERMISSION_TYPE_API)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to fetch policy rules", e))?;

        debug!(count = rows.len(), "Fetched policy rules");
        rows.into_iter().map(PolicyRuleRow::into_rule).collect()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}

//! Policy rule source trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::PolicyRule;

/// Read-only supplier of the complete current set of API permission rules.
#[async_trait]
pub trait PolicyRuleSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns a snapshot of every (role, path, method) allow rule.
    async fn policy_rules(&self) -> AppResult<Vec<PolicyRule>>;

    /// Whether the backing store currently answers.
    async fn health_check(&self) -> AppResult<bool>;
}

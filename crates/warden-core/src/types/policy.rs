//! Policy rule type.

use serde::{Deserialize, Serialize};

/// "Role may perform `method` on `path`."
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Role identifier.
    pub role_id: u64,
    /// Exact request path, e.g. `/v1/roles`.
    pub path: String,
    /// HTTP method, e.g. `GET`.
    pub method: String,
}

impl PolicyRule {
    /// Create a new rule.
    pub fn new(role_id: u64, path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            role_id,
            path: path.into(),
            method: method.into(),
        }
    }

    /// Policy subject for this rule's role, e.g. `role:1`.
    pub fn subject(&self) -> String {
        role_subject(&self.role_id.to_string())
    }
}

/// Formats a bare role identifier as a policy subject.
pub fn role_subject(role: &str) -> String {
    format!("role:{role}")
}

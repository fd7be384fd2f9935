//! The in-memory policy model.

use std::collections::HashSet;

use warden_core::types::PolicyRule;
use warden_core::types::policy::role_subject;

/// One authorization question: may `role` perform `method` on `path`?
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessRequest {
    /// Bare role identifier, e.g. `"1"`.
    pub role: String,
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
}

impl AccessRequest {
    /// Create a new request.
    pub fn new(role: impl Into<String>, path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            path: path.into(),
            method: method.into(),
        }
    }
}

/// Evaluates `(subject, path, method)` triples against a loaded rule set.
///
/// Implementations need no interior locking; [`PolicyEnforcer`](super::PolicyEnforcer)
/// serializes `load_rules` against `enforce`.
pub trait RuleEngine: Send + Sync + std::fmt::Debug + 'static {
    /// Replaces the entire rule set.
    fn load_rules(&mut self, rules: &[PolicyRule]);

    /// Returns whether `role` (a bare role id) may perform `method` on `path`.
    fn enforce(&self, role: &str, path: &str, method: &str) -> bool;

    /// Number of loaded rules.
    fn len(&self) -> usize;

    /// Whether no rules are loaded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Allows a request only when an identical `(role:{id}, path, method)` rule exists.
#[derive(Debug, Default, Clone)]
pub struct ExactMatchEngine {
    rules: HashSet<(String, String, String)>,
}

impl ExactMatchEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleEngine for ExactMatchEngine {
    fn load_rules(&mut self, rules: &[PolicyRule]) {
        self.rules.clear();
        self.rules.extend(
            rules
                .iter()
                .map(|r| (r.subject(), r.path.clone(), r.method.clone())),
        );
    }

    fn enforce(&self, role: &str, path: &str, method: &str) -> bool {
        self.rules
            .contains(&(role_subject(role), path.to_string(), method.to_string()))
    }

    fn len(&self) -> usize {
        self.rules.len()
    }
}

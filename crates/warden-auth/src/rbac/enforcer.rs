//! Policy enforcement over a reloadable rule model.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info};

use warden_core::error::{AppError, ErrorKind};
use warden_core::traits::PolicyRuleSource;

use super::model::{AccessRequest, ExactMatchEngine, RuleEngine};

/// Answers "may this role call this endpoint?" from an in-memory model.
///
/// `enforce` holds a shared lock; `load_policy` fetches rules without any
/// lock and then rebuilds the model under the exclusive lock, so a check
/// always sees one complete generation of rules.
pub struct PolicyEnforcer {
    /// Where rules come from.
    source: Arc<dyn PolicyRuleSource>,
    /// The loaded rules.
    model: RwLock<Box<dyn RuleEngine>>,
    /// Number of completed loads.
    generation: AtomicU64,
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer")
            .field("source", &self.source)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl PolicyEnforcer {
    /// Creates an enforcer with an empty exact-match model. Denies everything
    /// until the first successful [`load_policy`](Self::load_policy).
    pub fn new(source: Arc<dyn PolicyRuleSource>) -> Self {
        Self::with_engine(source, Box::new(ExactMatchEngine::new()))
    }

    /// Creates an enforcer over a custom rule engine.
    pub fn with_engine(source: Arc<dyn PolicyRuleSource>, engine: Box<dyn RuleEngine>) -> Self {
        Self {
            source,
            model: RwLock::new(engine),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the model with the source's current rules.
    ///
    /// If the fetch fails the previous model stays in force and the error
    /// is returned as `Internal`. Returns the new generation on success.
    pub async fn load_policy(&self) -> Result<u64, AppError> {
        let rules = self.source.policy_rules().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to fetch policy rules", e)
        })?;

        let mut model = self.model.write().await;
        model.load_rules(&rules);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let loaded = model.len();
        drop(model);

        info!(generation, rules = loaded, "Policy loaded");
        Ok(generation)
    }

    /// Returns whether `role` may perform `method` on `path`.
    pub async fn enforce(&self, role: &str, path: &str, method: &str) -> Result<bool, AppError> {
        let allowed = self.model.read().await.enforce(role, path, method);
        if !allowed {
            debug!(role, path, method, "Policy denied request");
        }
        Ok(allowed)
    }

    /// Evaluates several requests against the same generation of rules.
    pub async fn enforce_many(&self, requests: &[AccessRequest]) -> Result<Vec<bool>, AppError> {
        let model = self.model.read().await;
        Ok(requests
            .iter()
            .map(|r| model.enforce(&r.role, &r.path, &r.method))
            .collect())
    }

    /// Number of successful loads so far; `0` means nothing has been loaded.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of rules in the current model.
    pub async fn rule_count(&self) -> usize {
        self.model.read().await.len()
    }

    /// Whether the rule source can currently be reached.
    pub async fn source_health(&self) -> Result<bool, AppError> {
        self.source.health_check().await
    }
}

//! Role-based API authorization.
//!
//! Rules are loaded from a [`PolicyRuleSource`](warden_core::traits::PolicyRuleSource)
//! into an in-memory model. Requests are checked against that model by
//! [`PolicyEnforcer::enforce`]; the model is rebuilt by
//! [`PolicyEnforcer::load_policy`], usually through a [`PolicyReloader`].

pub mod enforcer;
pub mod model;
pub mod reload;

pub use enforcer::PolicyEnforcer;
pub use model::{AccessRequest, ExactMatchEngine, RuleEngine};
pub use reload::{PolicyReloader, ReloadStats, ScheduleOutcome};

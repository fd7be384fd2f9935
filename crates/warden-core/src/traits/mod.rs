//! Collaborator traits defined in `warden-core` and implemented by other crates.

pub mod credential_source;
pub mod policy_source;
pub mod session_store;

pub use credential_source::UserCredentialSource;
pub use policy_source::PolicyRuleSource;
pub use session_store::SessionStore;

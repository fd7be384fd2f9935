//! Shared domain types.

pub mod credentials;
pub mod identity;
pub mod policy;

pub use credentials::UserCredentials;
pub use identity::UserIdentity;
pub use policy::PolicyRule;

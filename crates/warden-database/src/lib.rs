//! # warden-database
//!
//! PostgreSQL connection management and the repositories that supply
//! policy rules and login credentials.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::rbac::RbacRepository;
pub use repositories::user::UserRepository;

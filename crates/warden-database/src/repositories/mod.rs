//! Repository implementations.

pub mod rbac;
pub mod user;

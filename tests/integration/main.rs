//! HTTP-level integration tests driving the router in-process.

mod auth_test;
mod gate_test;
mod health_test;
mod helpers;

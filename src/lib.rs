//! Campus Records - student, employee and department records service
//!
//! This crate provides the REST API over the records database: SeaORM entities,
//! soft-delete aware repository helpers, axum handlers and the router.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repo;
pub mod routes;
pub mod seed;
pub mod state;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;

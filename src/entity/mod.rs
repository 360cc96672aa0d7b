//! Entity module - SeaORM entity definitions
//!
//! One module per table. Every table carries a nullable `deleted_at` soft-delete marker.

pub mod department;
pub mod employee;
pub mod student;
pub mod user;

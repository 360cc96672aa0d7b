//! HTTP middleware

pub mod cors;

pub use cors::preflight_layer;

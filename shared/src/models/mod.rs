//! Data models
//!
//! Mirrors the JSON served by the shop backend's order endpoints.

pub mod order;

// Re-exports
pub use order::*;

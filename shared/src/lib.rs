//! Shared types for the storefront order layer
//!
//! Order records as served by the shop backend, the status-update payload,
//! and the lenient field parsers both the HTTP client and the dashboard
//! aggregation rely on.

pub mod models;
pub mod util;

// Re-exports
pub use models::{OrderRecord, OrderStatus, OrderStatusUpdate};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

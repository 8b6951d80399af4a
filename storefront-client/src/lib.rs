//! Storefront Client - HTTP client for the shop backend
//!
//! Provides the two calls the order layer depends on: the bulk order fetch
//! and the per-order status update, both authorized with a bearer token.

pub mod config;
pub mod error;
pub mod http;
pub mod token;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, ORDER_LIST_PATH, order_editor_path};
pub use token::{SharedToken, TokenProvider};

// Re-export shared types for convenience
pub use shared::{OrderRecord, OrderStatus, OrderStatusUpdate};

//! Order layer error types

use shared::OrderStatus;
use storefront_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// No access token yet; no request was issued and nothing changed locally
    #[error("Backend not ready: no access token")]
    NotReady,

    /// Bulk fetch failed; the store holds no records
    #[error("Order fetch failed: {0}")]
    FetchFailed(#[source] ClientError),

    /// Orders have not been fetched yet (or a fetch is running)
    #[error("Orders not loaded")]
    NotLoaded,

    /// The last fetch failed, derived views are unavailable
    #[error("Order load failed: {0}")]
    LoadFailed(String),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// Backend rejected the newest change for this order, local status restored
    #[error("Status update for order {id} failed, restored to {restored}")]
    StatusUpdateFailed {
        id: String,
        restored: OrderStatus,
        #[source]
        source: ClientError,
    },

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

pub type SyncResult<T> = Result<T, SyncError>;

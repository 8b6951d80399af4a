//! Backend seam
//!
//! The order layer only needs the bulk fetch and the status update, and
//! only cares whether the update succeeded.

use async_trait::async_trait;
use shared::{OrderRecord, OrderStatus};
use storefront_client::{ClientResult, HttpClient};

#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// `false` while no access token is available
    fn is_ready(&self) -> bool;

    async fn fetch_orders(&self) -> ClientResult<Vec<OrderRecord>>;

    async fn update_status(&self, id: &str, status: &OrderStatus) -> ClientResult<()>;
}

#[async_trait]
impl OrderBackend for HttpClient {
    fn is_ready(&self) -> bool {
        HttpClient::is_ready(self)
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<OrderRecord>> {
        HttpClient::fetch_orders(self).await
    }

    async fn update_status(&self, id: &str, status: &OrderStatus) -> ClientResult<()> {
        self.update_order_status(id, status).await
    }
}

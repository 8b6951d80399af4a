//! HTTP client for the shop backend order API

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    ClientConfig, ClientError, ClientResult, OrderRecord, OrderStatus, OrderStatusUpdate,
    SharedToken, TokenProvider,
};

/// Order list endpoint (relative to the API base URL)
pub const ORDER_LIST_PATH: &str = "shops/order-list-view/";

/// Order editor endpoint for a single order
pub fn order_editor_path(id: &str) -> String {
    format!("shops/order-editor/{}/", id)
}

/// HTTP client for making network requests to the shop backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            tokens: Arc::new(SharedToken::new(config.token.clone())),
        })
    }

    /// Replace the token source
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.tokens = provider;
        self
    }

    /// Use a fixed authentication token
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_token_provider(Arc::new(SharedToken::new(Some(token.into()))))
    }

    /// Whether a bearer token is currently available
    pub fn is_ready(&self) -> bool {
        self.tokens.access_token().is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Attach the bearer header, refusing to build a request without a token
    fn authorize(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.tokens.access_token().ok_or(ClientError::NotReady)?;
        Ok(request.bearer_auth(token))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)))?;
        let response = request.send().await.map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body, discarding the response payload
    pub async fn patch<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let request = self.authorize(self.client.patch(self.url(path)).json(body))?;
        let response = request.send().await.map_err(ClientError::from_transport)?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Map non-2xx responses to errors
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.map_err(ClientError::from_transport)?;
        tracing::debug!(status = %status, body = %text, "Backend returned error status");
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Internal(format!("{}: {}", status, text)),
        })
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await.map_err(ClientError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Order API ==========

    /// Fetch every order visible to the current shop account
    pub async fn fetch_orders(&self) -> ClientResult<Vec<OrderRecord>> {
        let orders: Vec<OrderRecord> = self.get(ORDER_LIST_PATH).await?;
        tracing::debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Set the status of one order
    pub async fn update_order_status(&self, id: &str, status: &OrderStatus) -> ClientResult<()> {
        let body = OrderStatusUpdate::new(status.clone());
        self.patch(&order_editor_path(id), &body).await
    }
}

//! Client configuration

/// Default request timeout (milliseconds)
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client configuration for connecting to the shop backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | STOREFRONT_API_URL | http://localhost:8000/api | API base URL |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | STOREFRONT_TOKEN | (unset) | Initial bearer token |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000/api")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api".into());
        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let mut config = Self::new(base_url).with_timeout_ms(timeout_ms);
        if let Ok(token) = std::env::var("STOREFRONT_TOKEN")
            && !token.is_empty()
        {
            config = config.with_token(token);
        }
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api")
    }
}

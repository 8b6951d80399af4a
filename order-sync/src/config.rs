//! Order layer configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | DASHBOARD_TIMEZONE | UTC | IANA zone used to bucket orders by month |
//! | TOP_SELLER_LIMIT | 10 | Length of the top-seller list |
//! | LOG_LEVEL | info | Default tracing filter |
//! | LOG_JSON | false | JSON log lines |
//!
//! Client settings come from [`ClientConfig::from_env`].

use chrono_tz::Tz;
use storefront_client::ClientConfig;

use crate::aggregate::TOP_SELLER_LIMIT;
use crate::dashboard::DashboardOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub timezone: Tz,
    pub top_sellers_limit: usize,
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    /// Read `.env` (if any), then the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let timezone = match std::env::var("DASHBOARD_TIMEZONE") {
            Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown DASHBOARD_TIMEZONE, using UTC");
                chrono_tz::UTC
            }),
            Err(_) => chrono_tz::UTC,
        };

        Self {
            client: ClientConfig::from_env(),
            timezone,
            top_sellers_limit: std::env::var("TOP_SELLER_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(TOP_SELLER_LIMIT),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions::new(self.timezone).with_top_sellers_limit(self.top_sellers_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            timezone: chrono_tz::UTC,
            top_sellers_limit: TOP_SELLER_LIMIT,
            log_level: "info".into(),
            log_json: false,
        }
    }
}

//! Application configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Notes |
//! |----------|---------|-------|
//! | SAVOR_PRINT_SERVER_URL | http://YOUR_CLOUD_SERVER_IP:8080 | relay base URL |
//! | SAVOR_PRINT_RESTAURANT_ID | hk-savor-spoon-main | default restaurant |
//! | SAVOR_PRINT_API_KEY | - | required for every relay call |
//! | SAVOR_PRINT_RETRY_ATTEMPTS | 3 | print attempts per job |
//! | SAVOR_PRINT_RETRY_DELAY_MS | 2000 | fixed wait between attempts |
//! | SAVOR_PRINT_ORIGIN | - | sent as `Origin` |
//! | SAVOR_PRINT_TIMEOUT_SECS | - | per-request timeout |
//! | SAVOR_PRINT_TIMEZONE | Asia/Hong_Kong | receipt clock |
//! | SAVOR_PRINT_RECEIPT_WIDTH | 32 | receipt columns |
//! | SAVOR_PRINT_STATUS_RESET_MS | 3000 | Success/Error back to Online |
//! | SAVOR_PRINT_LOG_JSON | false | JSON log lines |

use std::time::Duration;

use chrono_tz::Tz;
use savor_client::ClientConfig;
use savor_client::config::{
    DEFAULT_RESTAURANT_ID, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_SERVER_URL,
};
use savor_receipt::ReceiptRenderer;
use savor_receipt::renderer::{DEFAULT_TIMEZONE, DEFAULT_WIDTH};
use secrecy::SecretString;

use crate::error::{AppError, AppResult};
use crate::facade::DEFAULT_STATUS_RESET;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_url: String,
    pub restaurant_id: String,
    /// Absent until injected by the deployment
    pub api_key: Option<SecretString>,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub origin: Option<String>,
    pub request_timeout: Option<Duration>,
    pub timezone: Tz,
    pub receipt_width: usize,
    pub status_reset_delay: Duration,
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, unset variables take defaults
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server_url: get("SAVOR_PRINT_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.into()),
            restaurant_id: get("SAVOR_PRINT_RESTAURANT_ID")
                .unwrap_or_else(|| DEFAULT_RESTAURANT_ID.into()),
            api_key: get("SAVOR_PRINT_API_KEY").map(SecretString::from),
            retry_attempts: parse(&get, "SAVOR_PRINT_RETRY_ATTEMPTS")?
                .unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            retry_delay: parse(&get, "SAVOR_PRINT_RETRY_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_DELAY),
            origin: get("SAVOR_PRINT_ORIGIN"),
            request_timeout: parse(&get, "SAVOR_PRINT_TIMEOUT_SECS")?.map(Duration::from_secs),
            timezone: parse(&get, "SAVOR_PRINT_TIMEZONE")?.unwrap_or(DEFAULT_TIMEZONE),
            receipt_width: parse(&get, "SAVOR_PRINT_RECEIPT_WIDTH")?.unwrap_or(DEFAULT_WIDTH),
            status_reset_delay: parse(&get, "SAVOR_PRINT_STATUS_RESET_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_STATUS_RESET),
            log_json: parse(&get, "SAVOR_PRINT_LOG_JSON")?.unwrap_or(false),
        })
    }

    /// Client configuration; fails without an API key
    pub fn client_config(&self) -> AppResult<ClientConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(AppError::MissingSetting("SAVOR_PRINT_API_KEY"))?;

        let mut config = ClientConfig::with_secret(api_key)
            .with_server_url(self.server_url.clone())
            .with_restaurant_id(self.restaurant_id.clone())
            .with_retry_attempts(self.retry_attempts)
            .with_retry_delay(self.retry_delay);
        config.origin = self.origin.clone();
        config.request_timeout = self.request_timeout;
        Ok(config)
    }

    pub fn renderer(&self) -> ReceiptRenderer {
        ReceiptRenderer::new(self.receipt_width, self.timezone)
    }
}

fn parse<T, G>(get: &G, name: &'static str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::InvalidSetting { name, value }),
    }
}

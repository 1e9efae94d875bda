//! Client configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{ClientError, ClientResult};

/// Placeholder relay address; deployments must override it
pub const DEFAULT_SERVER_URL: &str = "http://YOUR_CLOUD_SERVER_IP:8080";
/// Main Hong Kong branch
pub const DEFAULT_RESTAURANT_ID: &str = "hk-savor-spoon-main";
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Client configuration for connecting to the cloud print relay
///
/// Immutable once handed to a [`PrintClient`](crate::PrintClient). The API
/// key has no default and must come from deployment configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay base URL (e.g., "http://203.0.113.10:8080")
    pub server_url: String,

    /// Restaurant used when a call does not name one
    pub restaurant_id: String,

    /// Sent as `X-API-Key` on every request
    pub api_key: SecretString,

    /// Print attempts per job, at least 1
    pub retry_attempts: u32,

    /// Fixed wait between print attempts
    pub retry_delay: Duration,

    /// Sent as `Origin` when set; the relay rejects unknown origins
    pub origin: Option<String>,

    /// Per-request timeout; `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration with the default relay, restaurant and retry settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_secret(SecretString::from(api_key.into()))
    }

    /// Same as [`ClientConfig::new`] for a key already held as a secret
    pub fn with_secret(api_key: SecretString) -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            restaurant_id: DEFAULT_RESTAURANT_ID.to_string(),
            api_key,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            origin: None,
            request_timeout: None,
        }
    }

    /// Set the relay base URL
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Set the default restaurant
    pub fn with_restaurant_id(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = restaurant_id.into();
        self
    }

    /// Set the number of print attempts
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Set the fixed delay between print attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Declare the caller's origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Bound every request by `timeout`
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Check the invariants the client relies on
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url().is_empty() {
            return Err(ClientError::Config("server_url must not be empty".into()));
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "server_url must start with http:// or https://, got {}",
                self.server_url
            )));
        }
        if self.restaurant_id.is_empty() {
            return Err(ClientError::Config("restaurant_id must not be empty".into()));
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(ClientError::Config("api_key must not be empty".into()));
        }
        if self.retry_attempts == 0 {
            return Err(ClientError::Config("retry_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

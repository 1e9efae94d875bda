//! Client error types

use shared::RequestError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Transport failure (DNS, refused connection, reset) or an unreadable body
    #[error("Network error: {0}")]
    Network(String),

    /// The relay answered but did not accept the request
    #[error("Server error: {message}")]
    Server {
        /// HTTP status, when the failure came from a non-2xx response
        status: Option<u16>,
        message: String,
    },

    /// Every print attempt failed
    #[error("Print failed after {attempts} attempts: {message}")]
    RetryExhausted { attempts: u32, message: String },

    /// The request could not be built
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn malformed_body(err: impl std::fmt::Display) -> Self {
        Self::Network(format!("malformed response body: {err}"))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// HTTP status carried by a server error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => *status,
            _ => None,
        }
    }

    /// The bare message, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::Network(msg) | Self::Validation(msg) | Self::Config(msg) => msg.clone(),
            Self::Server { message, .. } => message.clone(),
            Self::RetryExhausted { .. } => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed_body(err)
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<RequestError> for ClientError {
    fn from(err: RequestError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

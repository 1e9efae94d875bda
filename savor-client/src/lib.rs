//! Savor Client - HTTP client for the cloud print relay
//!
//! Builds print requests, talks to the relay's `print`, `health`,
//! `printers`, `test`, `queue` and `printers/register` endpoints, classifies
//! the responses and retries print submissions with a fixed delay.

pub mod config;
pub mod error;
pub mod http;
pub mod print_client;
pub mod retry;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, HttpResponse, InMemoryHttpClient, NetworkHttpClient, RecordedRequest};
pub use print_client::PrintClient;
pub use retry::RetryPolicy;

// Re-export shared types for convenience
pub use shared::{
    HealthStatus, PrintOptions, PrintRequest, PrintResult, PrinterInfo, PrinterRegistration,
    QueueStatus, RegistrationResult, TestResult,
};

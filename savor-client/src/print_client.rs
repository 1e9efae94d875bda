//! Print client - the relay's request/response contract
//!
//! Every operation but [`PrintClient::print_with_retry`] makes exactly one
//! request and hands the first error straight back to the caller.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use shared::util::now_iso;
use shared::{
    HealthStatus, PrintOptions, PrintRequest, PrintResult, PrinterInfo, PrinterRegistration,
    QueueStatus, RegistrationResult, TestResult,
};

use crate::http::{HttpClient, HttpResponse, NetworkHttpClient};
use crate::{ClientConfig, ClientError, ClientResult, RetryPolicy};

const QUEUED_MESSAGE: &str = "Print queued for retry";

/// Loose view of a relay reply
///
/// The relay reports failures with either `message` or `error`, and sets
/// `queued` when it kept the job for a later attempt.
#[derive(Debug, Default, Deserialize)]
struct RelayReply {
    success: Option<bool>,
    queued: Option<bool>,
    message: Option<String>,
    error: Option<String>,
    restaurant_id: Option<String>,
    printer_ip: Option<String>,
    timestamp: Option<String>,
}

impl RelayReply {
    fn reason(self, fallback: &str) -> String {
        self.message
            .or(self.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Body of `POST /printers/register`
#[derive(Serialize)]
struct RegisterBody<'a> {
    restaurant_id: &'a str,
    printer_ip: &'a str,
    printer_port: u16,
    location: Option<&'a str>,
    auth_key: &'a str,
}

/// Client for the cloud print relay
///
/// Cheap to clone; clones share the immutable configuration.
#[derive(Debug, Clone)]
pub struct PrintClient<H: HttpClient = NetworkHttpClient> {
    http: H,
    config: Arc<ClientConfig>,
    retry: RetryPolicy,
}

impl PrintClient<NetworkHttpClient> {
    /// Validate `config` and connect over the network
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = NetworkHttpClient::new(&config)?;
        Self::with_transport(config, http)
    }
}

impl<H: HttpClient> PrintClient<H> {
    /// Use an injected transport
    pub fn with_transport(config: ClientConfig, http: H) -> ClientResult<Self> {
        config.validate()?;
        let retry = RetryPolicy::from_config(&config);
        Ok(Self {
            http,
            config: Arc::new(config),
            retry,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for `text` with the current timestamp
    pub fn build_request(&self, text: &str, options: &PrintOptions) -> ClientResult<PrintRequest> {
        Ok(PrintRequest::new(
            text,
            options,
            &self.config.restaurant_id,
            now_iso(),
        )?)
    }

    // ========== Print API ==========

    /// Submit one print job
    ///
    /// Returns `Success` or `Queued`; any other reply is a
    /// [`ClientError::Server`], any transport failure a [`ClientError::Network`].
    #[instrument(skip(self, text, options), fields(text_len = text.len(), order_id = ?options.order_id))]
    pub async fn print_receipt(&self, text: &str, options: &PrintOptions) -> ClientResult<PrintResult> {
        let request = self.build_request(text, options)?;
        debug!(restaurant_id = %request.restaurant_id, "Sending print request");

        let response = self.http.post("print", &request).await?;
        let result = classify_print(&response)?;

        match &result {
            PrintResult::Queued { message } => warn!(%message, "Print queued by relay"),
            other => info!(message = %other.message(), "Print successful"),
        }
        Ok(result)
    }

    /// Submit one print job, retrying with a fixed delay
    ///
    /// Stops at the first `Success` or `Queued`. After `retry_attempts`
    /// failures returns [`ClientError::RetryExhausted`] carrying the last
    /// error's message.
    #[instrument(skip(self, text, options), fields(max_attempts = self.retry.attempts))]
    pub async fn print_with_retry(
        &self,
        text: &str,
        options: &PrintOptions,
    ) -> ClientResult<PrintResult> {
        // An unbuildable request fails the same way on every attempt
        self.build_request(text, options)?;

        self.retry
            .run(move |attempt| {
                debug!(attempt, max_attempts = self.retry.attempts, "Print attempt");
                self.print_receipt(text, options)
            })
            .await
    }

    // ========== Status API ==========

    /// Relay health
    #[instrument(skip(self))]
    pub async fn check_server_status(&self) -> ClientResult<HealthStatus> {
        let response = self.http.get("health").await?;
        ensure_success(&response)?;
        let status: HealthStatus = response.json()?;
        info!(status = ?status.status, "Cloud server online");
        Ok(status)
    }

    /// Printers known to the relay
    #[instrument(skip(self))]
    pub async fn get_registered_printers(&self) -> ClientResult<Vec<PrinterInfo>> {
        let response = self.http.get("printers").await?;
        ensure_success(&response)?;

        let mut body: Value = response.json()?;
        let printers = body
            .get_mut("registered_printers")
            .map(Value::take)
            .unwrap_or(Value::Null);
        PrinterInfo::list_from_value(printers).map_err(ClientError::malformed_body)
    }

    /// Ask the relay to print its test page
    ///
    /// Targets the configured restaurant when `restaurant_id` is `None`.
    #[instrument(skip(self))]
    pub async fn test_print(&self, restaurant_id: Option<&str>) -> ClientResult<TestResult> {
        let target = restaurant_id
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.config.restaurant_id);
        let path = format!("test/{}", urlencoding::encode(target));

        let response = self.http.post_empty(&path).await?;
        let body: Value = response.json()?;
        let reply: RelayReply = serde_json::from_value(body.clone()).map_err(ClientError::malformed_body)?;

        if response.is_success() && reply.success == Some(true) {
            info!(restaurant_id = %target, "Test print successful");
            return serde_json::from_value(body).map_err(ClientError::malformed_body);
        }
        Err(ClientError::server(
            Some(response.status),
            reply.reason("Test print failed"),
        ))
    }

    /// Jobs waiting in the relay's retry queue
    #[instrument(skip(self))]
    pub async fn queue_status(&self) -> ClientResult<QueueStatus> {
        let response = self.http.get("queue").await?;
        ensure_success(&response)?;
        response.json()
    }

    /// Announce a restaurant printer to the relay
    ///
    /// The relay authenticates registrations with the same API key.
    #[instrument(skip(self, registration), fields(restaurant_id = %registration.restaurant_id))]
    pub async fn register_printer(
        &self,
        registration: &PrinterRegistration,
    ) -> ClientResult<RegistrationResult> {
        let body = RegisterBody {
            restaurant_id: &registration.restaurant_id,
            printer_ip: &registration.printer_ip,
            printer_port: registration.printer_port,
            location: registration.location.as_deref(),
            auth_key: self.config.api_key.expose_secret(),
        };

        let response = self.http.post("printers/register", &body).await?;
        let value: Value = response.json()?;
        let reply: RelayReply = serde_json::from_value(value.clone()).map_err(ClientError::malformed_body)?;

        if response.is_success() && reply.success == Some(true) {
            info!(printer_ip = %registration.printer_ip, "Printer registered");
            return serde_json::from_value(value).map_err(ClientError::malformed_body);
        }
        Err(ClientError::server(
            Some(response.status),
            reply.reason("Printer registration failed"),
        ))
    }
}

/// Classify a `POST /print` reply
fn classify_print(response: &HttpResponse) -> ClientResult<PrintResult> {
    let reply: RelayReply = response.json()?;

    if response.is_success() && reply.success == Some(true) {
        return Ok(PrintResult::Success {
            message: reply.message.unwrap_or_default(),
            restaurant_id: reply.restaurant_id.unwrap_or_default(),
            printer_ip: reply.printer_ip.unwrap_or_default(),
            timestamp: reply.timestamp.unwrap_or_default(),
        });
    }

    // Queued replies may carry any status; the relay owns the job now
    if reply.queued == Some(true) {
        return Ok(PrintResult::Queued {
            message: reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| QUEUED_MESSAGE.to_string()),
        });
    }

    Err(ClientError::server(
        Some(response.status),
        reply.reason("Print failed"),
    ))
}

/// Turn a non-2xx reply into a server error carrying its status
fn ensure_success(response: &HttpResponse) -> ClientResult<()> {
    if response.is_success() {
        return Ok(());
    }
    let fallback = format!("Server returned {}", response.status);
    let message = serde_json::from_str::<RelayReply>(&response.body)
        .map(|reply| reply.reason(&fallback))
        .unwrap_or(fallback);
    Err(ClientError::server(Some(response.status), message))
}

//! HTTP transport - network and in-memory

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ClientConfig, ClientError, ClientResult};

/// Header carrying the relay API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Raw relay response: status plus undecoded body
///
/// Classification needs the status and the body together, and a non-2xx
/// reply may not be JSON at all, so decoding is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a response from a JSON value
    pub fn json_body(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body; an unreadable body is a transport-level failure
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(ClientError::malformed_body)
    }
}

/// Transport used by [`PrintClient`](crate::PrintClient)
///
/// Paths are relative to the relay base URL, without a leading slash.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str) -> ClientResult<HttpResponse>;
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<HttpResponse>;
    async fn post_empty(&self, path: &str) -> ClientResult<HttpResponse>;
}

/// Network transport backed by reqwest
///
/// Credentials and origin are installed as default headers, so every
/// request carries them.
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ClientError::Config("api_key is not a valid header value".into()))?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        if let Some(origin) = &config.origin {
            let origin = HeaderValue::from_str(origin)
                .map_err(|_| ClientError::Config(format!("invalid origin: {origin}")))?;
            headers.insert(ORIGIN, origin);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Relay base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read(response: reqwest::Response) -> ClientResult<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get(&self, path: &str) -> ClientResult<HttpResponse> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::read(response).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<HttpResponse> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::read(response).await
    }

    async fn post_empty(&self, path: &str) -> ClientResult<HttpResponse> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::read(response).await
    }
}

/// A request seen by [`InMemoryHttpClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted in-memory transport
///
/// Replies with queued responses in order and records every request. Used
/// in tests and for dry runs without a relay.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHttpClient {
    responses: Arc<Mutex<VecDeque<ClientResult<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl InMemoryHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    pub fn push(&self, response: ClientResult<HttpResponse>) -> &Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Queue a JSON reply with the given status
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(HttpResponse::json_body(status, &body)))
    }

    /// Queue a transport failure
    pub fn push_network_error(&self, message: &str) -> &Self {
        self.push(Err(ClientError::Network(message.to_string())))
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn respond(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<HttpResponse> {
        lock(&self.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response left".into())))
    }
}

/// A poisoned lock only means another test thread panicked; keep going
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl HttpClient for InMemoryHttpClient {
    async fn get(&self, path: &str) -> ClientResult<HttpResponse> {
        self.respond("GET", path, None)
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<HttpResponse> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::Validation(format!("unserializable body: {e}")))?;
        self.respond("POST", path, Some(body))
    }

    async fn post_empty(&self, path: &str) -> ClientResult<HttpResponse> {
        self.respond("POST", path, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
    }

    #[test]
    fn test_malformed_body_is_network_error() {
        let err = HttpResponse::new(200, "<html>").json::<Value>().unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_in_memory_replays_in_order() {
        let http = InMemoryHttpClient::new();
        http.push_json(200, json!({"n": 1}))
            .push_network_error("refused");

        let first = http.get("health").await.unwrap();
        assert_eq!(first.json::<Value>().unwrap()["n"], 1);
        assert!(http.post_empty("test/r1").await.unwrap_err().is_network());
        assert!(http.get("health").await.is_err());

        let requests = http.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].path, "test/r1");
    }

    #[test]
    fn test_network_client_rejects_bad_api_key() {
        let config = ClientConfig::new("bad\nkey").with_server_url("http://relay:8080");
        assert!(matches!(
            NetworkHttpClient::new(&config),
            Err(ClientError::Config(_))
        ));
    }
}

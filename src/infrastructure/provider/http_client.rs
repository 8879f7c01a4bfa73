//! # HTTP Client Utilities
//!
//! Authenticated JSON transport for the rate provider.
//!
//! This module provides a thin reqwest wrapper with:
//! - A base URL that request paths are joined onto
//! - HTTP Basic credentials attached to every call
//! - A per-request timeout
//! - Status and transport errors mapped to [`ProviderError`]
//!
//! # Examples
//!
//! ```ignore
//! use rate_bridge::infrastructure::provider::http_client::HttpClient;
//!
//! let client = HttpClient::new("https://ssapi.shipstation.com", 5000)?
//!     .with_basic_auth("key", "secret");
//! let carriers = client.get_json("/carriers").await?;
//! ```

use crate::infrastructure::provider::error::{ProviderError, ProviderResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// API key and secret sent as HTTP Basic credentials.
#[derive(Clone)]
struct BasicCredentials {
    username: String,
    password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client wrapper for the rate provider.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Credentials, if configured.
    credentials: Option<BasicCredentials>,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client for `base_url` with the specified timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider root URL; a trailing slash is dropped.
    /// * `timeout_ms` - Request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ProviderError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            timeout_ms,
        })
    }

    /// Attaches HTTP Basic credentials to every request.
    ///
    /// # Arguments
    ///
    /// * `username` - Provider API key.
    /// * `password` - Provider API secret.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(BasicCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true if non-empty credentials are attached.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| !c.username.is_empty() && !c.password.is_empty())
    }

    /// Makes a GET request and returns the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - Path joined onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout` or `ProviderError::Connection` if the request fails.
    /// Returns `ProviderError::Status` on a non-success status.
    /// Returns `ProviderError::MalformedResponse` if the body is not JSON.
    pub async fn get_json(&self, path: &str) -> ProviderResult<Value> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a POST request with a JSON body and returns the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - Path joined onto the base URL.
    /// * `body` - Request body, serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout` or `ProviderError::Connection` if the request fails.
    /// Returns `ProviderError::Status` on a non-success status.
    /// Returns `ProviderError::MalformedResponse` if the body is not JSON.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ProviderResult<Value> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, Some(&creds.password)),
            None => request,
        }
    }

    /// Handles the HTTP response, checking status and parsing JSON.
    async fn handle_response(&self, response: Response) -> ProviderResult<Value> {
        let status = response.status();

        if status.is_success() {
            response.json::<Value>().await.map_err(|e| {
                ProviderError::malformed_response(format!("Failed to parse response: {}", e))
            })
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(ProviderError::status(status.as_u16(), error_body))
        }
    }

    /// Maps a reqwest error to a ProviderError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("Connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_client() {
        let client = HttpClient::new("https://example.com/", 5000).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
        assert_eq!(client.base_url(), "https://example.com");
        assert!(!client.has_credentials());
    }

    #[test]
    fn joins_paths() {
        let client = HttpClient::new("https://example.com/api/", 1000).unwrap();
        assert_eq!(client.url("/carriers"), "https://example.com/api/carriers");
        assert_eq!(client.url("carriers"), "https://example.com/api/carriers");
    }

    #[test]
    fn empty_credentials_do_not_count() {
        let client = HttpClient::new("https://example.com", 1000)
            .unwrap()
            .with_basic_auth("key", "");
        assert!(!client.has_credentials());

        let client = client.with_basic_auth("key", "secret");
        assert!(client.has_credentials());
    }

    #[test]
    fn debug_hides_password() {
        let client = HttpClient::new("https://example.com", 1000)
            .unwrap()
            .with_basic_auth("key", "hunter2");
        assert!(!format!("{:?}", client).contains("hunter2"));
    }

    #[tokio::test]
    async fn sends_basic_auth() {
        let server = MockServer::start().await;
        // "key:secret"
        Mock::given(method("GET"))
            .and(path("/carriers"))
            .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri(), 1000)
            .unwrap()
            .with_basic_auth("key", "secret");
        let body = client.get_json("/carriers").await.unwrap();
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shipments/getrates"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri(), 1000).unwrap();
        let err = client
            .post_json("/shipments/getrates", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Status { status: 400, ref body } if body == "bad request"));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri(), 1000).unwrap();
        let err = client.get_json("/carriers").await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri(), 50).unwrap();
        let err = client.get_json("/carriers").await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { timeout_ms: Some(50), .. }));
    }
}

//! SMC HTTP Client
//!
//! A simple, type-safe HTTP client for the SMC server API.
//!
//! # Example
//!
//! ```no_run
//! use smc_client::SmcClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smc_client::ClientError> {
//!     let client = SmcClient::new("http://localhost:8080", "my-api-key");
//!
//!     let result = client.execute("say Backup starting").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

mod commands;
pub mod error;
mod logs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the SMC server API
///
/// Every request carries the API key in the `x-api-key` header. Methods are
/// grouped into:
/// - Server status and command execution
/// - Log queries
#[derive(Debug, Clone)]
pub struct SmcClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl SmcClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server (e.g., "http://localhost:8080")
    /// * `api_key` - Shared secret configured on the server
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("Request failed with status {}: {}", status, error_text);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};

    pub const KEY: &str = "client-test-key-123456";

    /// Serves `router` on a random local port and returns its base URL
    pub async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Mirrors the server's API key check
    pub fn check_key(headers: &HeaderMap) -> Result<(), Response> {
        match headers.get(super::API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
            Some(key) if key == KEY => Ok(()),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({
                    "error": "Unauthorized",
                    "message": "Invalid or missing API key"
                })),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SmcClient::new("http://localhost:8080", "key");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SmcClient::new("http://localhost:8080/", "key");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/status"), "http://localhost:8080/api/status");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = SmcClient::with_client("http://localhost:8080", "key", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        // Bind and drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SmcClient::new(format!("http://{}", addr), "key");
        let err = client.status().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}

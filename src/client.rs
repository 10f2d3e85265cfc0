//! HTTP client for a running docchat server.
//!
//! Used by the `ask` subcommand to exercise the API the same way the viewer
//! UI does.

use crate::models::{ChatRequest, ChatResponse, ErrorBody, HealthResponse};
use crate::{Error, Result};
use std::time::Duration;

/// Client for the docchat HTTP API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl ChatClient {
    /// Default server URL.
    pub const DEFAULT_URL: &'static str = "http://localhost:3001";

    /// Request timeout. Generous because the server adds simulated latency.
    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| Error::operation("build_http_client", e))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank message, or
    /// [`Error::OperationFailed`] if the request fails or the server answers
    /// with an error status.
    pub async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if request.message.trim().is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| Error::operation("chat_request", e))?;

        let status = response.status();
        if !status.is_success() {
            let cause = match response.json::<ErrorBody>().await {
                Ok(body) => format!("server returned {status}: {}", body.error),
                Err(_) => format!("server returned {status}"),
            };
            return Err(Error::OperationFailed {
                operation: "chat_request".to_string(),
                cause,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::operation("chat_response", e))
    }

    /// Checks server health.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| Error::operation("health_request", e))?;

        if !response.status().is_success() {
            return Err(Error::OperationFailed {
                operation: "health_request".to_string(),
                cause: format!("server returned {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::operation("health_response", e))
    }
}

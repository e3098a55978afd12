//! HTTP client for the assistant backend.
//!
//! [`ChatBackend`] is the seam the UI talks to; [`ApiClient`] is the real
//! implementation over `reqwest`.

use crate::api::{ChatReply, ChatRequest, ChatResponse, ClearResponse, StatusResponse};
use crate::config::Config;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Reason shown when a chat request never got a response.
pub const NETWORK_ERROR: &str = "Network error occurred";

/// Path of the status endpoint, relative to the server base URL.
pub const STATUS_PATH: &str = "api/status";
/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "api/chat";
/// Path of the clear-history endpoint.
pub const CLEAR_PATH: &str = "api/clear";

/// The three operations the client needs from the backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /api/status`.
    async fn status(&self) -> Result<StatusResponse, ClientError>;

    /// `POST /api/chat` with `{ "message": ... }`.
    async fn chat(&self, message: &str) -> Result<ChatResponse, ClientError>;

    /// `POST /api/clear` with no body.
    async fn clear(&self) -> Result<ClearResponse, ClientError>;
}

/// HTTP client bound to one backend server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            http,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Decode the body as JSON whatever the HTTP status.
    ///
    /// The backend reports application failures as 4xx/5xx with a JSON
    /// payload, so the status code alone says nothing useful.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::debug!(status, bytes = body.len(), "backend response");
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { status, source })
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn status(&self) -> Result<StatusResponse, ClientError> {
        let url = self.endpoint(STATUS_PATH)?;
        tracing::debug!(%url, "GET status");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let url = self.endpoint(CHAT_PATH)?;
        tracing::debug!(%url, chars = message.chars().count(), "POST chat");
        let response = self
            .http
            .post(url)
            .json(&ChatRequest::new(message))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn clear(&self) -> Result<ClearResponse, ClientError> {
        let url = self.endpoint(CLEAR_PATH)?;
        tracing::debug!(%url, "POST clear");
        let response = self.http.post(url).send().await?;
        Self::decode(response).await
    }
}

/// Parse the base URL and make sure relative joins keep its path.
fn normalize_base(base_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured server URL could not be parsed.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not complete (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something that is not the expected JSON.
    #[error("Invalid response from server (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Whether the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Turn the outcome of a chat request into the reply to show, or into the
/// `Error: ...` text shown in its place.
///
/// An undecodable body is described as is; any other client error counts
/// as a network error.
pub fn chat_outcome(result: Result<ChatResponse, ClientError>) -> Result<ChatReply, String> {
    match result {
        Ok(response) => response
            .into_reply()
            .map_err(|reason| format!("Error: {reason}")),
        Err(e @ ClientError::Decode { .. }) => Err(format!("Error: {e}")),
        Err(e) => {
            tracing::debug!(error = %e, "chat request failed");
            Err(format!("Error: {NETWORK_ERROR}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_adds_trailing_slash() {
        let url = normalize_base("http://localhost:5002").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5002/");

        let url = normalize_base("http://example.com/assistant").unwrap();
        assert_eq!(url.as_str(), "http://example.com/assistant/");
    }

    #[test]
    fn test_endpoints_join_under_base_path() {
        let client = ApiClient::new("http://example.com/assistant", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(CHAT_PATH).unwrap().as_str(),
            "http://example.com/assistant/api/chat"
        );
        assert_eq!(
            client.endpoint(STATUS_PATH).unwrap().as_str(),
            "http://example.com/assistant/api/status"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_chat_outcome_texts() {
        let ok = ChatResponse {
            success: true,
            response: Some("Friday".to_string()),
            model: Some("llama3".to_string()),
            ..ChatResponse::default()
        };
        let reply = chat_outcome(Ok(ok)).unwrap();
        assert_eq!(reply.content, "Friday");
        assert_eq!(reply.model.as_deref(), Some("llama3"));

        let failed = ChatResponse {
            success: false,
            error: Some("timeout".to_string()),
            ..ChatResponse::default()
        };
        assert_eq!(chat_outcome(Ok(failed)).unwrap_err(), "Error: timeout");

        let empty = ChatResponse {
            success: true,
            ..ChatResponse::default()
        };
        assert_eq!(
            chat_outcome(Ok(empty)).unwrap_err(),
            "Error: Failed to get response"
        );
    }

    #[test]
    fn test_chat_outcome_client_errors() {
        let transport = reqwest::Client::new().get("http://").build().unwrap_err();
        assert_eq!(
            chat_outcome(Err(ClientError::Transport(transport))).unwrap_err(),
            "Error: Network error occurred"
        );

        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let text = chat_outcome(Err(ClientError::Decode { status: 502, source })).unwrap_err();
        assert!(text.starts_with("Error: Invalid response from server (HTTP 502): "));
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5002/");
    }
}

//! Wire types for the assistant backend.
//!
//! The backend answers every endpoint with a JSON object carrying a
//! `success` flag. Missing booleans decode as `false` and missing strings as
//! `None`, so a truncated payload is treated as an application failure
//! rather than a decode error.

use serde::{Deserialize, Serialize};

/// Fallback reason when the backend reports failure without saying why.
pub const GENERIC_CHAT_FAILURE: &str = "Failed to get response";

/// Response of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the status check itself succeeded.
    #[serde(default)]
    pub success: bool,

    /// Whether the model server behind the backend is reachable.
    #[serde(default)]
    pub ollama_running: bool,

    /// Name of the configured model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Whether retrieval augmentation is switched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_enabled: Option<bool>,

    /// Failure reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Whether the client should display itself as connected.
    ///
    /// A failed status check is never "connected", whatever the other
    /// fields claim.
    pub fn is_connected(&self) -> bool {
        self.success && self.ollama_running
    }

    /// Human-readable model label, e.g. `Model: llama3 (RAG Enabled)`.
    pub fn model_label(&self) -> Option<String> {
        let model = self.model.as_deref().filter(|m| !m.is_empty())?;
        if self.rag_enabled.unwrap_or(false) {
            Some(format!("Model: {model} (RAG Enabled)"))
        } else {
            Some(format!("Model: {model}"))
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, already trimmed.
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,

    /// Assistant text on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Model that produced the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_enabled: Option<bool>,

    /// Failure reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successful assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub model: Option<String>,
}

impl ChatResponse {
    /// Split the payload into a reply or a failure reason.
    ///
    /// `success: true` without a `response` field counts as a failure.
    pub fn into_reply(self) -> Result<ChatReply, String> {
        match (self.success, self.response) {
            (true, Some(content)) => Ok(ChatReply {
                content,
                model: self.model,
            }),
            (true, None) => Err(GENERIC_CHAT_FAILURE.to_string()),
            (false, _) => Err(self
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| GENERIC_CHAT_FAILURE.to_string())),
        }
    }
}

/// Response of `POST /api/clear`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_with_rag() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"success":true,"ollama_running":true,"model":"llama3","rag_enabled":true}"#,
        )
        .unwrap();
        assert!(status.is_connected());
        assert_eq!(
            status.model_label().as_deref(),
            Some("Model: llama3 (RAG Enabled)")
        );
    }

    #[test]
    fn test_status_label_without_rag() {
        let status = StatusResponse {
            success: true,
            ollama_running: false,
            model: Some("mistral".into()),
            rag_enabled: Some(false),
            error: None,
        };
        assert!(!status.is_connected());
        assert_eq!(status.model_label().as_deref(), Some("Model: mistral"));
    }

    #[test]
    fn test_status_missing_fields_default() {
        let status: StatusResponse = serde_json::from_str("{}").unwrap();
        assert!(!status.success);
        assert!(!status.is_connected());
        assert_eq!(status.model_label(), None);
    }

    #[test]
    fn test_failed_status_is_not_connected() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"success":false,"ollama_running":true}"#).unwrap();
        assert!(!status.is_connected());
    }

    #[test]
    fn test_chat_request_serialization() {
        let json = serde_json::to_string(&ChatRequest::new("hello")).unwrap();
        assert_eq!(json, r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_chat_reply_success() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"success":true,"response":"Hi there","model":"llama3","rag_enabled":true}"#,
        )
        .unwrap();
        let reply = response.into_reply().unwrap();
        assert_eq!(reply.content, "Hi there");
        assert_eq!(reply.model.as_deref(), Some("llama3"));
    }

    #[test]
    fn test_chat_reply_application_error() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"success":false,"error":"timeout"}"#).unwrap();
        assert_eq!(response.into_reply().unwrap_err(), "timeout");
    }

    #[test]
    fn test_chat_reply_failure_without_reason() {
        let response: ChatResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(response.into_reply().unwrap_err(), GENERIC_CHAT_FAILURE);

        let empty_reason = ChatResponse {
            error: Some(String::new()),
            ..ChatResponse::default()
        };
        assert_eq!(empty_reason.into_reply().unwrap_err(), GENERIC_CHAT_FAILURE);
    }

    #[test]
    fn test_chat_reply_success_missing_response() {
        let response: ChatResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(response.into_reply().unwrap_err(), GENERIC_CHAT_FAILURE);
    }

    #[test]
    fn test_clear_response() {
        let response: ClearResponse =
            serde_json::from_str(r#"{"success":true,"message":"History cleared"}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("History cleared"));
    }
}

//! Test utilities for relchat-tui rendering and controller tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ratatui::{buffer::Buffer, layout::Rect};
use relchat_engine::{ChatBackend, ChatResponse, ClearResponse, ClientError, StatusResponse};

use crate::controller::ChatController;
use crate::screens::render_app;

pub use crate::headless::buffer_to_string;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Render the whole chat screen, overlays included.
pub fn render_to_string(controller: &ChatController, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    render_app(controller, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// A real transport error, without touching the network.
pub fn transport_error() -> ClientError {
    match reqwest::Client::new().get("http://").build() {
        Err(e) => ClientError::Transport(e),
        Ok(_) => panic!("a request without a host should not build"),
    }
}

/// A decode error as produced for a non-JSON body.
pub fn decode_error(status: u16) -> ClientError {
    match serde_json::from_str::<serde_json::Value>("<html>Bad Gateway</html>") {
        Err(source) => ClientError::Decode { status, source },
        Ok(_) => panic!("html should not parse as json"),
    }
}

/// Backend double with fixed answers.
///
/// Chat replies echo the message back, prefixed with `echo: `.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    offline: bool,
    clear_fails: bool,
    delay: Duration,
    sent: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// Backend that answers everything successfully.
    pub fn online() -> Self {
        Self::default()
    }

    /// Backend whose requests all fail at the transport level.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Backend that takes far longer than any test waits.
    pub fn slow() -> Self {
        Self {
            delay: Duration::from_secs(3600),
            ..Self::default()
        }
    }

    /// Backend that refuses to clear history.
    pub fn clear_fails() -> Self {
        Self {
            clear_fails: true,
            ..Self::default()
        }
    }

    /// Messages received by `chat`, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    async fn respond(&self) -> Result<(), ClientError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.offline {
            return Err(transport_error());
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.respond().await?;
        Ok(StatusResponse {
            success: true,
            ollama_running: true,
            model: Some("llama3".to_string()),
            rag_enabled: Some(true),
            error: None,
        })
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse, ClientError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.to_string());
        }
        self.respond().await?;
        Ok(ChatResponse {
            success: true,
            response: Some(format!("echo: {message}")),
            model: Some("llama3".to_string()),
            rag_enabled: Some(true),
            error: None,
        })
    }

    async fn clear(&self) -> Result<ClearResponse, ClientError> {
        self.respond().await?;
        if self.clear_fails {
            return Ok(ClearResponse {
                success: false,
                message: None,
                error: Some("history store unavailable".to_string()),
            });
        }
        Ok(ClearResponse {
            success: true,
            message: Some("Conversation history cleared".to_string()),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        let result = buffer_to_string(&buffer);
        assert_eq!(result, "Hello\nWorld\n");
    }

    #[test]
    fn test_error_helpers() {
        assert!(transport_error().is_transport());
        assert!(!decode_error(502).is_transport());
    }

    #[tokio::test]
    async fn test_scripted_backend_records_messages() {
        let backend = ScriptedBackend::online();
        let reply = backend.chat("hello").await.unwrap();
        assert_eq!(reply.response.as_deref(), Some("echo: hello"));
        assert_eq!(backend.sent_messages(), vec!["hello".to_string()]);

        let offline = ScriptedBackend::offline();
        assert!(offline.status().await.unwrap_err().is_transport());
    }
}

//! relchat-engine: Headless core of the relchat assistant client
//!
//! This crate provides everything the client needs that does not touch a
//! terminal:
//! - Wire types for the `/api/status`, `/api/chat` and `/api/clear` endpoints
//! - An HTTP client and the [`ChatBackend`] seam the UI depends on
//! - Configuration loading, validation and overrides

pub mod api;
pub mod client;
pub mod config;

// Re-export commonly used types
pub use api::{ChatReply, ChatRequest, ChatResponse, ClearResponse, StatusResponse};
pub use client::{chat_outcome, ApiClient, ChatBackend, ClientError, NETWORK_ERROR};
pub use config::{Config, ConfigError, UiConfig};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

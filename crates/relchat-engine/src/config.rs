//! Configuration types for the relchat client.
//!
//! Configuration lives in a JSON file (default `.relchat/config.json`).
//! Every field has a default, so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".relchat/config.json";

/// Environment variable that overrides [`Config::server_url`].
pub const SERVER_ENV_VAR: &str = "RELCHAT_SERVER";

/// Main configuration for relchat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the assistant backend.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Timeout in seconds for a single backend request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Animation and layout settings for the terminal UI.
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_server_url() -> String {
    "http://localhost:5002".into()
}

fn default_request_timeout() -> u64 {
    300
}

/// Terminal UI settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between revealed characters of an assistant reply.
    #[serde(default = "default_typewriter_interval")]
    pub typewriter_interval_ms: u64,

    /// Period of the typing indicator phrase rotation.
    #[serde(default = "default_typing_rotation")]
    pub typing_rotation_ms: u64,

    /// Length of fade-out transitions.
    #[serde(default = "default_fade")]
    pub fade_ms: u64,

    /// Event loop tick rate; bounds animation smoothness.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Maximum visible height of the input box, in lines.
    #[serde(default = "default_max_input_lines")]
    pub max_input_lines: u16,
}

fn default_typewriter_interval() -> u64 {
    20
}

fn default_typing_rotation() -> u64 {
    2000
}

fn default_fade() -> u64 {
    300
}

fn default_tick_rate() -> u64 {
    20
}

fn default_max_input_lines() -> u16 {
    6
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            typewriter_interval_ms: default_typewriter_interval(),
            typing_rotation_ms: default_typing_rotation(),
            fade_ms: default_fade(),
            tick_rate_ms: default_tick_rate(),
            max_input_lines: default_max_input_lines(),
        }
    }
}

impl UiConfig {
    pub fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_interval_ms)
    }

    pub fn typing_rotation(&self) -> Duration {
        Duration::from_millis(self.typing_rotation_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_seconds: default_request_timeout(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Replace the server URL when an override is present.
    ///
    /// Empty overrides are ignored so that `RELCHAT_SERVER=` behaves like unset.
    #[must_use]
    pub fn with_server_override(mut self, server: Option<&str>) -> Self {
        if let Some(server) = server.map(str::trim).filter(|s| !s.is_empty()) {
            self.server_url = server.to_string();
        }
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.server_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", self.server_url)))?;

        let timings = [
            ("typewriter_interval_ms", self.ui.typewriter_interval_ms),
            ("typing_rotation_ms", self.ui.typing_rotation_ms),
            ("fade_ms", self.ui.fade_ms),
            ("tick_rate_ms", self.ui.tick_rate_ms),
        ];
        if let Some((name, _)) = timings.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidTiming((*name).to_string()));
        }
        if self.ui.max_input_lines == 0 {
            return Err(ConfigError::InvalidTiming("max_input_lines".to_string()));
        }
        Ok(())
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The server URL is not a valid URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// A UI setting that must be positive is zero.
    #[error("UI setting `{0}` must be greater than zero")]
    InvalidTiming(String),
}

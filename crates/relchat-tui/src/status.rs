//! Backend connection status shown in the header.

use crate::ui::theme::{Styles, Symbols};
use ratatui::style::Style;

/// Whether the backend reported a running model server.
///
/// Refreshed once at startup. Starts out disconnected until the first
/// status reply says otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    pub fn dot(self) -> &'static str {
        match self {
            Self::Connected => Symbols::DOT,
            Self::Disconnected => Symbols::DOT_EMPTY,
        }
    }

    pub fn style(self) -> Style {
        match self {
            Self::Connected => Styles::success(),
            Self::Disconnected => Styles::error(),
        }
    }
}

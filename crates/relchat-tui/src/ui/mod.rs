//! UI building blocks for the relchat TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

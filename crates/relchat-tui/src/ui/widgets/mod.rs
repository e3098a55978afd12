//! Reusable widgets for the relchat TUI.

pub mod input_bar;
pub mod status_bar;
pub mod text_input;

pub use input_bar::{input_text_width, InputBar};
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;

//! Text rendering utilities.

mod wrap;

pub use wrap::{wrap_chars, wrap_text, wrap_width};

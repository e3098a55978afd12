//! Conversation module.
//!
//! Holds the messages shown to the user, their animations, the welcome
//! banner that stands in for an empty conversation, and the pane that
//! draws all of it.

mod entry;
mod scroll;
mod view;
mod welcome;
mod widget;

pub use entry::{EntryId, MessageEntry, Role};
pub use scroll::{TranscriptScroll, WHEEL_STEP};
pub use view::{ConversationView, ViewAdvance};
pub use welcome::{WelcomeBanner, FEATURE_TAGS, WELCOME_TEXT, WELCOME_TITLE};
pub use widget::ConversationPane;

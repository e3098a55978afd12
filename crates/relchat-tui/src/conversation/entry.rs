//! A single rendered message.

use crate::animation::{Schedule, Typewriter};
use chrono::{DateTime, Local};
use std::time::Instant;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// Stable identifier of an entry within one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) u64);

/// A message shown in the conversation view.
///
/// The content never changes after creation. Only the typewriter reveal
/// changes how much of it is visible.
#[derive(Debug, Clone)]
pub struct MessageEntry {
    id: EntryId,
    role: Role,
    content: String,
    timestamp: DateTime<Local>,
    model: Option<String>,
    reveal: Option<Typewriter>,
    fade: Option<Schedule>,
}

impl MessageEntry {
    pub(crate) fn new(
        id: EntryId,
        role: Role,
        content: String,
        model: Option<String>,
        reveal: Option<Typewriter>,
    ) -> Self {
        // Model tags are only shown on assistant messages.
        let model = model.filter(|_| role == Role::Assistant);
        Self {
            id,
            role,
            content,
            timestamp: Local::now(),
            model,
            reveal,
            fade: None,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The full, final text.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Timestamp as shown next to the bubble, e.g. `02:35 PM`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%I:%M %p").to_string()
    }

    /// The part of the content revealed so far.
    pub fn visible_text(&self) -> &str {
        let Some(reveal) = &self.reveal else {
            return &self.content;
        };
        match self.content.char_indices().nth(reveal.shown()) {
            Some((byte, _)) => &self.content[..byte],
            None => &self.content,
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.as_ref().is_some_and(|r| !r.is_done())
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub(crate) fn finish_reveal(&mut self) {
        if let Some(reveal) = &mut self.reveal {
            reveal.finish();
        }
    }

    pub(crate) fn advance_reveal(&mut self, now: Instant) -> bool {
        self.reveal.as_mut().is_some_and(|r| r.advance(now))
    }

    /// Start fading out. Returns false if already fading.
    pub(crate) fn start_fade(&mut self, fade: Schedule) -> bool {
        if self.fade.is_some() {
            return false;
        }
        // The reveal must not keep running on an entry that is going away.
        self.finish_reveal();
        self.fade = Some(fade);
        true
    }

    /// Whether the fade has completed and the entry should be removed.
    pub(crate) fn fade_elapsed(&mut self, now: Instant) -> bool {
        self.fade.as_mut().is_some_and(|f| f.poll(now) > 0)
    }
}

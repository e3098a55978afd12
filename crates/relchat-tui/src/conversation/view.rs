//! The ordered list of messages shown to the user.

use super::entry::{EntryId, MessageEntry, Role};
use crate::animation::{Schedule, Typewriter};
use std::time::{Duration, Instant};

/// Result of advancing the view's animations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewAdvance {
    /// Whether any visible text changed.
    pub revealed: bool,
    /// Number of faded entries removed.
    pub removed: usize,
}

/// Append-only conversation view.
#[derive(Debug, Clone, Default)]
pub struct ConversationView {
    entries: Vec<MessageEntry>,
    next_id: u64,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    /// Number of entries that are not on their way out.
    pub fn live_len(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_fading()).count()
    }

    /// Append a user message, shown in full right away.
    pub fn push_user(&mut self, content: impl Into<String>) -> EntryId {
        let id = self.allocate_id();
        self.entries
            .push(MessageEntry::new(id, Role::User, content.into(), None, None));
        id
    }

    /// Append an assistant message with a typewriter reveal.
    ///
    /// Only the newest assistant entry animates: any reveal still running
    /// on an older entry is completed first.
    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        model: Option<String>,
        interval: Duration,
        now: Instant,
    ) -> EntryId {
        for entry in &mut self.entries {
            entry.finish_reveal();
        }
        let content = content.into();
        let reveal = Typewriter::start(&content, interval, now);
        let id = self.allocate_id();
        self.entries.push(MessageEntry::new(
            id,
            Role::Assistant,
            content,
            model,
            Some(reveal),
        ));
        id
    }

    /// Start fading every entry. Returns how many started fading.
    pub fn fade_all(&mut self, fade: Duration, now: Instant) -> usize {
        let mut started = 0;
        for entry in &mut self.entries {
            if entry.start_fade(Schedule::once(fade, now)) {
                started += 1;
            }
        }
        started
    }

    pub fn is_fading(&self) -> bool {
        self.entries.iter().any(MessageEntry::is_fading)
    }

    pub fn is_revealing(&self) -> bool {
        self.entries.iter().any(MessageEntry::is_revealing)
    }

    /// Advance reveals and drop entries whose fade has elapsed.
    pub fn advance(&mut self, now: Instant) -> ViewAdvance {
        let mut revealed = false;
        for entry in &mut self.entries {
            revealed |= entry.advance_reveal(now);
        }

        let before = self.entries.len();
        self.entries.retain_mut(|entry| !entry.fade_elapsed(now));

        ViewAdvance {
            revealed,
            removed: before - self.entries.len(),
        }
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }
}

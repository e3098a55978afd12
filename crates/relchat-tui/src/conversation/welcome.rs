//! Welcome banner shown while the conversation is empty.

use crate::animation::Schedule;
use std::time::{Duration, Instant};

pub const WELCOME_TITLE: &str = "Welcome to Release Dashboard AI Assistant";

pub const WELCOME_TEXT: &str = "I'm your AI assistant for the Release Dashboard project. \
Ask me anything about releases, patches, Jira tickets, database backups, or any \
project-related questions. I'll use context from previous conversations to provide \
accurate answers.";

pub const FEATURE_TAGS: [&str; 4] = [
    "RAG Enabled",
    "Local LLM",
    "Context-Aware",
    "Release Dashboard",
];

/// Visibility of the welcome banner.
#[derive(Debug, Clone, Default)]
pub enum WelcomeBanner {
    #[default]
    Visible,
    /// Still drawn, dimmed, until the fade elapses.
    Leaving(Schedule),
    Hidden,
}

impl WelcomeBanner {
    /// Whether the banner counts as present.
    ///
    /// A leaving banner is already gone as far as the conversation is
    /// concerned; it is only still drawn.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }

    /// Whether the banner should be drawn at all.
    pub fn is_drawn(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self, Self::Leaving(_))
    }

    /// Start fading the banner out. No-op unless visible.
    pub fn dismiss(&mut self, fade: Duration, now: Instant) {
        if self.is_visible() {
            *self = Self::Leaving(Schedule::once(fade, now));
        }
    }

    /// Show the banner again, cancelling any fade in progress.
    pub fn show(&mut self) {
        if let Self::Leaving(schedule) = self {
            schedule.cancel();
        }
        *self = Self::Visible;
    }

    /// Finish a fade that has elapsed. Returns whether the banner changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if let Self::Leaving(schedule) = self {
            if schedule.poll(now) > 0 {
                *self = Self::Hidden;
                return true;
            }
        }
        false
    }
}

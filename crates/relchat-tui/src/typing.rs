//! Typing indicator shown while a chat request is outstanding.

use crate::animation::Schedule;
use std::time::{Duration, Instant};

/// Phrases the indicator cycles through, in order.
pub const TYPING_PHRASES: [&str; 4] = [
    "Thinking...",
    "Retrieving context...",
    "Analyzing conversation history...",
    "Generating response...",
];

/// Period of the bouncing-dots frame, independent of the phrase rotation.
const DOTS_FRAME: Duration = Duration::from_millis(400);

/// Number of dots drawn after the phrase.
pub const DOT_COUNT: usize = 3;

/// A live typing indicator.
///
/// The controller holds at most one of these in an `Option`; taking it out
/// and calling [`TypingIndicator::stop`] is how the indicator is removed.
#[derive(Debug, Clone)]
pub struct TypingIndicator {
    index: usize,
    rotation: Schedule,
    started: Instant,
    dots_frame: usize,
}

impl TypingIndicator {
    /// Start on phrase 0, rotating every `period`.
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            index: 0,
            rotation: Schedule::every(period, now),
            started: now,
            dots_frame: 0,
        }
    }

    /// Advance the phrase rotation and the dots. Returns whether the phrase changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started);
        #[allow(clippy::cast_possible_truncation)]
        {
            self.dots_frame = (elapsed.as_millis() / DOTS_FRAME.as_millis()) as usize % (DOT_COUNT + 1);
        }

        let steps = self.rotation.poll(now) as usize;
        if steps == 0 {
            return false;
        }
        self.index = (self.index + steps) % TYPING_PHRASES.len();
        true
    }

    /// Cancel the rotation. Consumes the indicator so it cannot be reused.
    pub fn stop(mut self) {
        self.rotation.cancel();
        tracing::trace!(phrase = self.index, "typing indicator stopped");
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phrase(&self) -> &'static str {
        TYPING_PHRASES[self.index]
    }

    /// Number of lit dots, `0..=DOT_COUNT`.
    pub fn dots(&self) -> usize {
        self.dots_frame
    }
}

//! Scroll position of the transcript.

use std::cell::Cell;

/// Lines scrolled per mouse wheel tick.
pub const WHEEL_STEP: usize = 3;

/// Transcript scroll position, counted in lines up from the bottom.
///
/// Zero means follow mode: the newest lines stay in view. The upper bound
/// is only known once the transcript has been laid out, so rendering
/// records it through [`TranscriptScroll::offset`].
#[derive(Debug, Clone, Default)]
pub struct TranscriptScroll {
    from_bottom: usize,
    max: Cell<usize>,
}

impl TranscriptScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the view sticks to the newest lines.
    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }

    pub fn from_bottom(&self) -> usize {
        self.from_bottom
    }

    /// Scroll towards older lines. Leaves follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.from_bottom = self.from_bottom.saturating_add(amount).min(self.max.get());
    }

    /// Scroll towards newer lines. Reaching the bottom re-enables follow mode.
    pub fn scroll_down(&mut self, amount: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(amount);
    }

    /// Jump to the newest lines and follow them.
    pub fn to_bottom(&mut self) {
        self.from_bottom = 0;
    }

    /// Top line to draw for a transcript of `total` lines in `height` rows.
    ///
    /// Records the scrollable range so later scrolling is clamped to it.
    pub fn offset(&self, total: usize, height: usize) -> usize {
        let max = total.saturating_sub(height);
        self.max.set(max);
        max - self.from_bottom.min(max)
    }
}

//! Scheduled animation steps.
//!
//! Animations are driven from the event loop tick: each one owns a
//! [`Schedule`] and is advanced with the current instant. Nothing runs in
//! the background, so cancelling a schedule (or dropping its owner) is all
//! it takes to stop an animation.

use std::time::{Duration, Instant};

/// Shortest period a schedule will accept.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A one-shot or repeating deadline.
#[derive(Debug, Clone)]
pub struct Schedule {
    next_due: Instant,
    period: Duration,
    repeat: bool,
    cancelled: bool,
}

impl Schedule {
    /// Fire every `period`, first at `start + period`.
    pub fn every(period: Duration, start: Instant) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            next_due: start + period,
            period,
            repeat: true,
            cancelled: false,
        }
    }

    /// Fire once, at `start + delay`.
    pub fn once(delay: Duration, start: Instant) -> Self {
        Self {
            next_due: start + delay,
            period: delay.max(MIN_PERIOD),
            repeat: false,
            cancelled: false,
        }
    }

    /// Number of firings due at `now`.
    ///
    /// The deadline moves past every firing counted, so a late tick catches
    /// up instead of drifting. A one-shot schedule fires at most once and is
    /// spent afterwards.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if self.cancelled || now < self.next_due {
            return 0;
        }
        if !self.repeat {
            self.cancelled = true;
            return 1;
        }

        let overdue = now.duration_since(self.next_due).as_nanos();
        let fired = 1 + overdue / self.period.as_nanos();
        let fired = u32::try_from(fired).unwrap_or(u32::MAX);
        self.next_due += self.period * fired;
        fired
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the schedule will never fire again.
    pub fn is_finished(&self) -> bool {
        self.cancelled
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }
}

/// Character-by-character reveal of a piece of text.
///
/// The first character is visible immediately; one more appears per
/// interval until the whole text is shown.
#[derive(Debug, Clone)]
pub struct Typewriter {
    total: usize,
    shown: usize,
    schedule: Schedule,
}

impl Typewriter {
    pub fn start(text: &str, interval: Duration, now: Instant) -> Self {
        let total = text.chars().count();
        let mut schedule = Schedule::every(interval, now);
        if total <= 1 {
            schedule.cancel();
        }
        Self {
            total,
            shown: total.min(1),
            schedule,
        }
    }

    /// Reveal whatever is due. Returns whether anything changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.is_done() {
            return false;
        }
        let due = self.schedule.poll(now) as usize;
        if due == 0 {
            return false;
        }
        self.shown = (self.shown + due).min(self.total);
        if self.is_done() {
            self.schedule.cancel();
        }
        true
    }

    /// Show the whole text at once.
    pub fn finish(&mut self) {
        self.shown = self.total;
        self.schedule.cancel();
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.total
    }

    /// Number of characters currently visible.
    pub fn shown(&self) -> usize {
        self.shown
    }
}

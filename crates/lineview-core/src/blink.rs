//! Caret blink timer.
//!
//! Time is passed in explicitly so the state machine stays deterministic; the host calls
//! [`CaretBlink::is_visible`] with its frame clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlinkState {
    Running { since: Instant },
    Stopped { visible: bool },
}

/// Caret blink animation.
#[derive(Debug, Clone)]
pub struct CaretBlink {
    interval: Duration,
    state: BlinkState,
}

impl CaretBlink {
    /// Create a running blink starting visible at `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            state: BlinkState::Running { since: now },
        }
    }

    /// Blink half-period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the half-period; restarts the phase at `now`.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.restart(now);
    }

    /// Freeze the animation in its current visibility.
    pub fn stop(&mut self, now: Instant) {
        let visible = self.is_visible(now);
        self.state = BlinkState::Stopped { visible };
    }

    /// Force the caret visible (keeps the animation stopped if it was).
    pub fn show(&mut self) {
        if let BlinkState::Stopped { visible } = &mut self.state {
            *visible = true;
        }
    }

    /// Restart the animation from its visible phase.
    pub fn restart(&mut self, now: Instant) {
        self.state = BlinkState::Running { since: now };
    }

    /// Whether the animation is running.
    pub fn is_running(&self) -> bool {
        matches!(self.state, BlinkState::Running { .. })
    }

    /// Caret visibility at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        match self.state {
            BlinkState::Stopped { visible } => visible,
            BlinkState::Running { since } => {
                let interval = self.interval.as_nanos().max(1);
                let elapsed = now.saturating_duration_since(since).as_nanos();
                (elapsed / interval) % 2 == 0
            }
        }
    }
}

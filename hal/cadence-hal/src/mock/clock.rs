use core::cell::Cell;

use crate::clock::{Clock, Millis};

/// Manually driven clock
///
/// Time only moves when the test says so, or by a fixed step on every
/// read when built with [`MockClock::with_auto_advance`]. The latter lets
/// busy-wait loops such as the scheduler tick make progress.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<Millis>,
    step: Cell<Millis>,
}

impl MockClock {
    /// Clock frozen at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that advances by `step` ms after every read
    pub fn with_auto_advance(step: Millis) -> Self {
        Self {
            now: Cell::new(0),
            step: Cell::new(step),
        }
    }

    /// Jump to an absolute time
    pub fn set_time(&self, ms: Millis) {
        self.now.set(ms);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Current time without triggering auto-advance
    pub fn peek(&self) -> Millis {
        self.now.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Millis {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step.get()));
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_until_moved() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 0);

        clock.set_time(900);
        assert_eq!(clock.now_ms(), 900);

        clock.advance(100);
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_auto_advance() {
        let clock = MockClock::with_auto_advance(5);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 5);
        assert_eq!(clock.peek(), 10);
    }
}

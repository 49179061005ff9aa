//! Elapsed-time primitives
//!
//! [`Timer`] is the building block for debounce and delays: it is armed on
//! a rising edge of its input and reports, as a level, whether its duration
//! has passed since then. [`PeriodicTicker`] is the scheduler's tick
//! source.

use cadence_hal::{elapsed_ms, is_reached, Clock, Millis};

/// Edge-armed, level-reporting timer
///
/// `active(true)` only captures the start instant when the timer is not
/// already armed, so calling it every pass with a held input measures how
/// long the input has been held.
#[derive(Debug)]
pub struct Timer<'a, C: ?Sized> {
    clock: &'a C,
    duration: Millis,
    armed: bool,
    started: Millis,
}

impl<'a, C: Clock + ?Sized> Timer<'a, C> {
    /// Disarmed timer of the given duration
    pub fn new(clock: &'a C, duration: Millis) -> Self {
        Self {
            clock,
            duration,
            armed: false,
            started: 0,
        }
    }

    /// Arm on `true` (if not already armed), disarm on `false`
    pub fn active(&mut self, start: bool) {
        if !start {
            self.armed = false;
        } else if !self.armed {
            self.armed = true;
            self.started = self.clock.now_ms();
        }
    }

    /// Armed and at least `duration` ms since arming
    ///
    /// Stays true until the timer is disarmed or reset.
    pub fn is_time_elapsed(&self) -> bool {
        self.armed && elapsed_ms(self.clock.now_ms(), self.started) >= self.duration
    }

    /// Disarm and forget the start instant
    pub fn reset(&mut self) {
        self.armed = false;
        self.started = 0;
    }

    /// Change the duration; arming state is untouched
    pub fn set_time(&mut self, duration: Millis) {
        self.duration = duration;
    }

    /// Configured duration
    pub fn duration(&self) -> Millis {
        self.duration
    }

    /// Armed since the last rising `active` call
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time since arming, `None` while disarmed
    pub fn elapsed(&self) -> Option<Millis> {
        self.armed.then(|| elapsed_ms(self.clock.now_ms(), self.started))
    }
}

/// Fixed-period tick source with absolute deadlines
///
/// Each deadline is the previous deadline plus the period, never "now plus
/// the period". A late pass therefore does not push later deadlines
/// forward: the ticker falls behind the wall clock and catches up with
/// back-to-back ticks instead of drifting.
#[derive(Debug)]
pub struct PeriodicTicker<'a, C: ?Sized> {
    clock: &'a C,
    period: Millis,
    deadline: Millis,
}

impl<'a, C: Clock + ?Sized> PeriodicTicker<'a, C> {
    /// Ticker with the given period, first deadline one period from now
    pub fn new(clock: &'a C, period: Millis) -> Self {
        let mut ticker = Self {
            clock,
            period,
            deadline: 0,
        };
        ticker.setup_period(period);
        ticker
    }

    /// Restart with a new period, first deadline one period from now
    pub fn setup_period(&mut self, period: Millis) {
        self.period = period;
        self.deadline = self.clock.now_ms().wrapping_add(period);
    }

    /// Restart at `hz` ticks per second (period `1000 / hz` ms)
    ///
    /// Zero is treated as 1 Hz.
    pub fn setup_freq(&mut self, hz: u32) {
        self.setup_period(1000 / hz.max(1));
    }

    /// Tick period
    pub fn period(&self) -> Millis {
        self.period
    }

    /// Deadline the next wait resolves at
    pub fn deadline(&self) -> Millis {
        self.deadline
    }

    /// Busy-poll the clock until the deadline, then advance it by one period
    ///
    /// Returns how late the poll resolved, in ms past the deadline.
    pub fn wait_for_next_tick(&mut self) -> Millis {
        let now = loop {
            let now = self.clock.now_ms();
            if is_reached(now, self.deadline) {
                break now;
            }
        };
        let lateness = elapsed_ms(now, self.deadline);
        self.deadline = self.deadline.wrapping_add(self.period);
        lateness
    }
}

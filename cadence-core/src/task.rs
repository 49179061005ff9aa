//! Periodic task contract
//!
//! A task is any value that can run one step (`tick`) and carries its own
//! [`TaskTiming`]. The scheduler calls
//! [`update_and_check_time`](Task::update_and_check_time) once per base
//! period on every active task and ticks the ones that come due.

use cadence_hal::Millis;

/// Period bookkeeping carried by every task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskTiming {
    /// Configured period
    pub period_ms: Millis,
    /// Time accumulated since the last fire
    pub elapsed_ms: Millis,
    /// Inactive tasks are skipped by the scheduler
    pub active: bool,
}

impl TaskTiming {
    /// Inert timing: inactive until `init`
    pub const fn new() -> Self {
        Self {
            period_ms: 0,
            elapsed_ms: 0,
            active: false,
        }
    }
}

/// A unit of periodic work
///
/// Implementors provide `tick` and access to their [`TaskTiming`]; the
/// lifecycle methods are provided.
pub trait Task {
    /// Run one step; must not block
    fn tick(&mut self);

    /// Return to the task's initial application state
    fn reset(&mut self) {}

    fn timing(&self) -> &TaskTiming;

    fn timing_mut(&mut self) -> &mut TaskTiming;

    /// Arm with the given period: counter cleared, task active
    fn init(&mut self, period_ms: Millis) {
        *self.timing_mut() = TaskTiming {
            period_ms,
            elapsed_ms: 0,
            active: true,
        };
    }

    fn is_active(&self) -> bool {
        self.timing().active
    }

    fn set_active(&mut self, active: bool) {
        self.timing_mut().active = active;
    }

    fn period(&self) -> Millis {
        self.timing().period_ms
    }

    /// Account one base period; true when the task is due
    ///
    /// Firing clears the counter, dropping any excess over the period.
    fn update_and_check_time(&mut self, base_period_ms: Millis) -> bool {
        let timing = self.timing_mut();
        timing.elapsed_ms = timing.elapsed_ms.saturating_add(base_period_ms);
        if timing.elapsed_ms >= timing.period_ms {
            timing.elapsed_ms = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        timing: TaskTiming,
        ticks: u32,
    }

    impl Task for Counter {
        fn tick(&mut self) {
            self.ticks += 1;
        }

        fn reset(&mut self) {
            self.ticks = 0;
        }

        fn timing(&self) -> &TaskTiming {
            &self.timing
        }

        fn timing_mut(&mut self) -> &mut TaskTiming {
            &mut self.timing
        }
    }

    fn counter() -> Counter {
        Counter {
            timing: TaskTiming::new(),
            ticks: 0,
        }
    }

    #[test]
    fn test_constructed_inert() {
        let task = counter();
        assert!(!task.is_active());
        assert_eq!(task.period(), 0);
    }

    #[test]
    fn test_init_arms() {
        let mut task = counter();
        task.init(150);
        assert!(task.is_active());
        assert_eq!(task.timing(), &TaskTiming { period_ms: 150, elapsed_ms: 0, active: true });
    }

    #[test]
    fn test_due_every_period() {
        let mut task = counter();
        task.init(150);
        let due: [bool; 6] = core::array::from_fn(|_| task.update_and_check_time(50));
        assert_eq!(due, [false, false, true, false, false, true]);
    }

    #[test]
    fn test_excess_dropped() {
        let mut task = counter();
        task.init(100);
        // Period not a multiple of the base: 120 >= 100 fires, the 20 is lost
        assert!(task.update_and_check_time(120));
        assert_eq!(task.timing().elapsed_ms, 0);
        assert!(!task.update_and_check_time(60));
    }

    #[test]
    fn test_set_active_and_reset() {
        let mut task = counter();
        task.init(50);
        task.tick();
        task.set_active(false);
        assert!(!task.is_active());
        task.set_active(true);
        assert!(task.is_active());
        task.reset();
        assert_eq!(task.ticks, 0);
    }
}

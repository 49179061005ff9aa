//! Cooperative fixed-tick scheduler
//!
//! One [`schedule`](Scheduler::schedule) call is one pass: wait for the
//! next base-period deadline, then walk the registry in registration order
//! and tick every task that is active and due. Everything runs to
//! completion on the caller's thread; a slow task delays every task after
//! it in the same pass and every later pass.

mod stats;

pub use stats::SchedulerStats;

use cadence_hal::{Clock, Millis};
use heapless::Vec;

use crate::task::Task;
use crate::timer::PeriodicTicker;

/// Maximum registered tasks
pub const MAX_TASKS: usize = 10;

/// Default base period before `init`
pub const DEFAULT_BASE_PERIOD_MS: Millis = 50;

/// Registry of tasks plus the tick source that paces them
///
/// Holds the tasks by mutable reference; the application owns them.
/// Tasks are never removed, only paused with `set_active(false)`.
pub struct Scheduler<'a, C: ?Sized> {
    ticker: PeriodicTicker<'a, C>,
    tasks: Vec<&'a mut dyn Task, MAX_TASKS>,
    stats: SchedulerStats,
}

impl<'a, C: Clock + ?Sized> Scheduler<'a, C> {
    /// Empty scheduler at the default base period
    pub fn new(clock: &'a C) -> Self {
        Self {
            ticker: PeriodicTicker::new(clock, DEFAULT_BASE_PERIOD_MS),
            tasks: Vec::new(),
            stats: SchedulerStats::new(),
        }
    }

    /// Set the base period, restart the tick source and drop all tasks
    pub fn init(&mut self, base_period_ms: Millis) {
        self.ticker.setup_period(base_period_ms);
        self.tasks.clear();
        self.stats = SchedulerStats::new();
    }

    /// Like [`init`](Self::init) with the base period given as a rate
    pub fn init_freq(&mut self, hz: u32) {
        self.ticker.setup_freq(hz);
        self.tasks.clear();
        self.stats = SchedulerStats::new();
    }

    /// Append a task; false (and not registered) when the registry is full
    ///
    /// Registering the same task twice is not detected.
    pub fn add_task(&mut self, task: &'a mut dyn Task) -> bool {
        if self.tasks.push(task).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("task registry full ({=usize}), task dropped", MAX_TASKS);
            return false;
        }
        true
    }

    /// Run one pass
    pub fn schedule(&mut self) {
        let lateness = self.ticker.wait_for_next_tick();
        let base = self.ticker.period();
        self.stats.passes = self.stats.passes.wrapping_add(1);
        if lateness > base {
            self.stats.overruns = self.stats.overruns.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("scheduler pass {=u32} ms late", lateness);
        }
        self.stats.max_lateness_ms = self.stats.max_lateness_ms.max(lateness);

        for task in self.tasks.iter_mut() {
            if task.is_active() && task.update_and_check_time(base) {
                task.tick();
                self.stats.invocations = self.stats.invocations.wrapping_add(1);
            }
        }
    }

    /// Current base period
    pub fn base_period(&self) -> Millis {
        self.ticker.period()
    }

    /// Registered tasks, active or not
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Task at registration `index`
    pub fn task(&self, index: usize) -> Option<&(dyn Task + 'a)> {
        self.tasks.get(index).map(|task| &**task)
    }

    /// Mutable task at registration `index`, e.g. to pause it
    pub fn task_mut(&mut self, index: usize) -> Option<&mut (dyn Task + 'a)> {
        self.tasks.get_mut(index).map(|task| &mut **task)
    }

    /// Counters since the last `init`
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskTiming;
    use cadence_hal::mock::MockClock;
    use core::cell::RefCell;
    use heapless::Vec as HVec;

    /// Records (task id, time) on every tick
    struct Recorder<'l> {
        id: u8,
        timing: TaskTiming,
        clock: &'l MockClock,
        log: &'l RefCell<HVec<(u8, Millis), 64>>,
    }

    impl<'l> Recorder<'l> {
        fn new(id: u8, clock: &'l MockClock, log: &'l RefCell<HVec<(u8, Millis), 64>>) -> Self {
            Self {
                id,
                timing: TaskTiming::new(),
                clock,
                log,
            }
        }
    }

    impl Task for Recorder<'_> {
        fn tick(&mut self) {
            let _ = self.log.borrow_mut().push((self.id, self.clock.peek()));
        }

        fn timing(&self) -> &TaskTiming {
            &self.timing
        }

        fn timing_mut(&mut self) -> &mut TaskTiming {
            &mut self.timing
        }
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let clock = MockClock::with_auto_advance(1);
        let log = RefCell::new(HVec::new());
        let mut fast = Recorder::new(0, &clock, &log);
        let mut slow = Recorder::new(1, &clock, &log);
        fast.init(50);
        slow.init(100);

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);
        assert!(scheduler.add_task(&mut slow));
        assert!(scheduler.add_task(&mut fast));

        for _ in 0..4 {
            scheduler.schedule();
        }

        let ids: HVec<u8, 64> = log.borrow().iter().map(|(id, _)| *id).collect();
        // Pass 1: fast; pass 2: slow then fast; ...
        assert_eq!(ids.as_slice(), &[0, 1, 0, 0, 1, 0]);
        assert_eq!(scheduler.stats().passes, 4);
        assert_eq!(scheduler.stats().invocations, 6);
    }

    #[test]
    fn test_inactive_task_skipped() {
        let clock = MockClock::with_auto_advance(1);
        let log = RefCell::new(HVec::new());
        let mut task = Recorder::new(7, &clock, &log);
        task.init(50);

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);
        scheduler.add_task(&mut task);

        scheduler.task_mut(0).unwrap().set_active(false);
        for _ in 0..3 {
            scheduler.schedule();
        }
        assert!(log.borrow().is_empty());

        scheduler.task_mut(0).unwrap().set_active(true);
        scheduler.schedule();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_uninitialized_task_never_fires() {
        let clock = MockClock::with_auto_advance(1);
        let log = RefCell::new(HVec::new());
        let mut task = Recorder::new(0, &clock, &log);

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(10);
        scheduler.add_task(&mut task);
        scheduler.schedule();
        assert!(log.borrow().is_empty());
        assert!(!scheduler.task(0).unwrap().is_active());
    }

    #[test]
    fn test_reinit_drops_registered_tasks() {
        let clock = MockClock::with_auto_advance(1);
        let log = RefCell::new(HVec::new());
        let mut first = Recorder::new(0, &clock, &log);
        let mut second = Recorder::new(1, &clock, &log);
        first.init(50);
        second.init(50);

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);
        assert!(scheduler.add_task(&mut first));
        assert!(scheduler.add_task(&mut second));
        scheduler.schedule();
        assert_eq!(log.borrow().len(), 2);

        scheduler.init(20);
        assert_eq!(scheduler.task_count(), 0);
        assert!(scheduler.task(0).is_none());
        assert_eq!(scheduler.base_period(), 20);
        assert_eq!(scheduler.stats(), &SchedulerStats::new());

        for _ in 0..5 {
            scheduler.schedule();
        }
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(scheduler.stats().passes, 5);
        assert_eq!(scheduler.stats().invocations, 0);
    }

    #[test]
    fn test_registry_capacity() {
        let clock = MockClock::new();
        let log = RefCell::new(HVec::new());
        let mut tasks: [Recorder<'_>; MAX_TASKS + 1] =
            core::array::from_fn(|i| Recorder::new(i as u8, &clock, &log));

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);
        let (last, rest) = tasks.split_last_mut().unwrap();
        for task in rest.iter_mut() {
            assert!(scheduler.add_task(task));
        }
        assert!(!scheduler.add_task(last));
        assert_eq!(scheduler.task_count(), MAX_TASKS);
    }

    #[test]
    fn test_ticks_on_base_grid() {
        let clock = MockClock::with_auto_advance(1);
        let log = RefCell::new(HVec::new());
        let mut task = Recorder::new(0, &clock, &log);
        task.init(100);

        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);
        scheduler.add_task(&mut task);
        for _ in 0..4 {
            scheduler.schedule();
        }

        let times: HVec<Millis, 64> = log.borrow().iter().map(|(_, t)| *t).collect();
        // init() read the clock at 1, so deadlines sit at 51, 101, 151, 201;
        // the clock steps once more after the read that resolves each wait
        assert_eq!(times.as_slice(), &[102, 202]);
    }

    #[test]
    fn test_overrun_counted() {
        let clock = MockClock::with_auto_advance(1);
        let mut scheduler = Scheduler::new(&clock);
        scheduler.init(50);

        scheduler.schedule();
        clock.set_time(400);
        scheduler.schedule();
        assert_eq!(scheduler.stats().overruns, 1);
        // Second deadline was 101
        assert_eq!(scheduler.stats().max_lateness_ms, 299);
        assert_eq!(scheduler.base_period(), 50);
    }

    #[test]
    fn test_init_freq() {
        let clock = MockClock::new();
        let mut scheduler = Scheduler::new(&clock);
        scheduler.init_freq(10);
        assert_eq!(scheduler.base_period(), 100);
    }
}

use cadence_hal::Millis;

/// Counters kept by the scheduler across passes
///
/// All counters wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SchedulerStats {
    /// Passes run
    pub passes: u32,
    /// `tick()` calls made
    pub invocations: u32,
    /// Passes that started more than one base period after their deadline
    pub overruns: u32,
    /// Worst lateness seen
    pub max_lateness_ms: Millis,
}

impl SchedulerStats {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            passes: 0,
            invocations: 0,
            overruns: 0,
            max_lateness_ms: 0,
        }
    }
}

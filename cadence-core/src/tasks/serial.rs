//! Tasks that drive the host link

use cadence_hal::ByteStream;
use cadence_protocol::SerialManager;

use crate::task::{Task, TaskTiming};

/// Publishes the register to the host once per period
///
/// While the host has not connected, each tick is a handshake attempt.
/// Write failures are counted and logged; the next tick tries again.
pub struct SerialOutputTask<'m, 'a, S> {
    manager: &'m SerialManager<'a, S>,
    timing: TaskTiming,
    failures: u32,
}

impl<'m, 'a, S: ByteStream> SerialOutputTask<'m, 'a, S> {
    /// Inert task publishing through `manager`
    pub fn new(manager: &'m SerialManager<'a, S>) -> Self {
        Self {
            manager,
            timing: TaskTiming::new(),
            failures: 0,
        }
    }

    /// Send cycles that failed on a transport error
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl<S: ByteStream> Task for SerialOutputTask<'_, '_, S> {
    fn tick(&mut self) {
        if self.manager.send_data().is_err() {
            self.failures = self.failures.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("host link write failed ({=u32} so far)", self.failures);
        }
    }

    fn reset(&mut self) {
        self.failures = 0;
    }

    fn timing(&self) -> &TaskTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut TaskTiming {
        &mut self.timing
    }
}

/// Applies host commands to the incoming slots once per period
pub struct SerialInputTask<'m, 'a, S> {
    manager: &'m SerialManager<'a, S>,
    timing: TaskTiming,
    failures: u32,
}

impl<'m, 'a, S: ByteStream> SerialInputTask<'m, 'a, S> {
    /// Inert task polling `manager` for commands
    pub fn new(manager: &'m SerialManager<'a, S>) -> Self {
        Self {
            manager,
            timing: TaskTiming::new(),
            failures: 0,
        }
    }

    /// Polls that failed on a transport error
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl<S: ByteStream> Task for SerialInputTask<'_, '_, S> {
    fn tick(&mut self) {
        if self.manager.get_data().is_err() {
            self.failures = self.failures.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("host link read failed ({=u32} so far)", self.failures);
        }
    }

    fn reset(&mut self) {
        self.failures = 0;
    }

    fn timing(&self) -> &TaskTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut TaskTiming {
        &mut self.timing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_hal::mock::MockStream;
    use core::cell::Cell;

    #[test]
    fn test_output_task_handshakes_then_sends() {
        let wire = MockStream::new();
        let level = Cell::new(9u8);
        let manager = SerialManager::new(&wire);
        manager.add_byte(&level);
        let mut task = SerialOutputTask::new(&manager);
        task.init(250);

        task.tick();
        assert!(wire.take_tx().is_empty());

        wire.push_rx(&[0xFF]);
        task.tick();
        assert_eq!(wire.take_tx().as_slice(), &[0x0A]);

        task.tick();
        assert_eq!(wire.take_tx().as_slice(), &[0xFF, 0x00, 1, 0, 0, 0, 1, 9]);
    }

    #[test]
    fn test_output_task_counts_failures() {
        let wire = MockStream::new();
        let manager = SerialManager::new(&wire);
        let mut task = SerialOutputTask::new(&manager);
        wire.push_rx(&[0xFF]);
        task.tick();

        wire.fail_writes(true);
        task.tick();
        task.tick();
        assert_eq!(task.failures(), 2);
        task.reset();
        assert_eq!(task.failures(), 0);
    }

    #[test]
    fn test_input_task_applies_commands() {
        let wire = MockStream::new();
        let manager = SerialManager::new(&wire);
        let mut task = SerialInputTask::new(&manager);

        wire.push_rx(&[0xFF, 0xFF, 0x00, 0x00, 0x02, 0x34, 0x12]);
        task.tick();
        task.tick();
        assert_eq!(manager.incoming(0), Some(0x1234));
        assert_eq!(task.failures(), 0);
    }
}

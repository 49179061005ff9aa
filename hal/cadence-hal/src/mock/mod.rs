//! Deterministic capability sources for host tests
//!
//! Every mock takes `&self` for both the capability side and the test-control
//! side, so a test can keep a handle and keep steering it while primitives
//! under test hold shared references.

mod clock;
mod pins;
mod stream;

pub use clock::MockClock;
pub use pins::{MockInputs, MockOutputs, MOCK_PIN_COUNT};
pub use stream::{MockStream, MockStreamError, MOCK_RX_CAPACITY, MOCK_TX_CAPACITY};

use crate::clock::{Clock, Millis};
use crate::gpio::{InputSource, PinId};

/// Mock clock and mock inputs in one value
///
/// Satisfies [`crate::Platform`] for primitives that want both.
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub clock: MockClock,
    pub inputs: MockInputs,
}

impl MockPlatform {
    /// Clock at zero, all pins low
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for MockPlatform {
    fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }
}

impl InputSource for MockPlatform {
    fn digital_state(&self, pin: PinId) -> bool {
        self.inputs.digital_state(pin)
    }

    fn analog_value(&self, pin: PinId) -> u16 {
        self.inputs.analog_value(pin)
    }
}

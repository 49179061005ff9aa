//! Clock and inputs bundled as one [`cadence_hal::Platform`]

use cadence_hal::{Clock, InputSource, Millis, PinId};
use embedded_hal::digital::InputPin;

use crate::clock::Rp2040Clock;
use crate::inputs::Rp2040Inputs;

/// Board time source plus input banks
///
/// Sampling primitives take one `&Rp2040Platform` for both.
pub struct Rp2040Platform<'d, P> {
    pub clock: Rp2040Clock,
    pub inputs: Rp2040Inputs<'d, P>,
}

impl<'d, P: InputPin> Rp2040Platform<'d, P> {
    /// Bundle `inputs` with the embassy-time clock
    pub fn new(inputs: Rp2040Inputs<'d, P>) -> Self {
        Self {
            clock: Rp2040Clock::new(),
            inputs,
        }
    }
}

impl<P> Clock for Rp2040Platform<'_, P> {
    fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }
}

impl<P: InputPin> InputSource for Rp2040Platform<'_, P> {
    fn digital_state(&self, pin: PinId) -> bool {
        self.inputs.digital_state(pin)
    }

    fn analog_value(&self, pin: PinId) -> u16 {
        self.inputs.analog_value(pin)
    }
}

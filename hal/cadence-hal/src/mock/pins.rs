use core::cell::Cell;

use crate::gpio::{InputSource, OutputSink, PinId, ANALOG_MAX};

/// Number of pins the mocks model
pub const MOCK_PIN_COUNT: usize = 32;

/// Settable input pins
///
/// One slot per pin shared by the digital and analog views, like a board
/// whose analog pins double as digital ones: non-zero reads as high.
#[derive(Debug)]
pub struct MockInputs {
    pins: [Cell<u16>; MOCK_PIN_COUNT],
}

impl Default for MockInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInputs {
    /// All pins low
    pub fn new() -> Self {
        Self {
            pins: core::array::from_fn(|_| Cell::new(0)),
        }
    }

    /// Set a digital level; out-of-range pins are ignored
    pub fn set_digital(&self, pin: PinId, high: bool) {
        if let Some(slot) = self.pins.get(pin as usize) {
            slot.set(u16::from(high));
        }
    }

    /// Set a raw analog reading, clamped to `ANALOG_MAX`
    pub fn set_analog(&self, pin: PinId, value: u16) {
        if let Some(slot) = self.pins.get(pin as usize) {
            slot.set(value.min(ANALOG_MAX));
        }
    }
}

impl InputSource for MockInputs {
    fn digital_state(&self, pin: PinId) -> bool {
        self.pins
            .get(pin as usize)
            .map(|slot| slot.get() != 0)
            .unwrap_or(false)
    }

    fn analog_value(&self, pin: PinId) -> u16 {
        self.pins.get(pin as usize).map(Cell::get).unwrap_or(0)
    }
}

/// Recording output pins
#[derive(Debug)]
pub struct MockOutputs {
    levels: [Cell<bool>; MOCK_PIN_COUNT],
    duties: [Cell<u8>; MOCK_PIN_COUNT],
}

impl Default for MockOutputs {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOutputs {
    /// All pins low, all duties zero
    pub fn new() -> Self {
        Self {
            levels: core::array::from_fn(|_| Cell::new(false)),
            duties: core::array::from_fn(|_| Cell::new(0)),
        }
    }

    /// Last digital level written to `pin`
    pub fn level(&self, pin: PinId) -> bool {
        self.levels.get(pin as usize).map(Cell::get).unwrap_or(false)
    }

    /// Last duty written to `pin`
    pub fn duty(&self, pin: PinId) -> u8 {
        self.duties.get(pin as usize).map(Cell::get).unwrap_or(0)
    }
}

impl OutputSink for MockOutputs {
    fn set_digital(&self, pin: PinId, high: bool) {
        if let Some(slot) = self.levels.get(pin as usize) {
            slot.set(high);
        }
    }

    fn set_analog(&self, pin: PinId, duty: u8) {
        if let Some(slot) = self.duties.get(pin as usize) {
            slot.set(duty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_share_slot() {
        let inputs = MockInputs::new();
        inputs.set_analog(3, 512);
        assert!(inputs.digital_state(3));
        assert_eq!(inputs.analog_value(3), 512);

        inputs.set_digital(3, false);
        assert_eq!(inputs.analog_value(3), 0);
    }

    #[test]
    fn test_out_of_range_pins() {
        let inputs = MockInputs::new();
        inputs.set_digital(200, true);
        assert!(!inputs.digital_state(200));
        assert_eq!(inputs.analog_value(200), 0);
    }

    #[test]
    fn test_analog_clamped() {
        let inputs = MockInputs::new();
        inputs.set_analog(0, 4095);
        assert_eq!(inputs.analog_value(0), ANALOG_MAX);
    }

    #[test]
    fn test_outputs_record() {
        let outputs = MockOutputs::new();
        outputs.set_digital(13, true);
        outputs.set_analog(9, 128);
        assert!(outputs.level(13));
        assert_eq!(outputs.duty(9), 128);
    }
}

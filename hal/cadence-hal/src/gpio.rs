//! Raw pin access
//!
//! Pins are addressed by a small integer id rather than by owned pin
//! objects, so sensor wrappers can be constructed from configuration
//! values. Implementations map ids to whatever the chip provides.

/// Pin identifier
pub type PinId = u8;

/// Upper bound of the raw analog domain (10-bit)
///
/// Implementations with wider converters scale down to `0..=ANALOG_MAX`.
pub const ANALOG_MAX: u16 = 1023;

/// Raw input readings
///
/// Unknown pin ids read as `false` / `0` rather than failing.
pub trait InputSource {
    /// Current logic level of a digital pin
    fn digital_state(&self, pin: PinId) -> bool;

    /// Current raw reading of an analog pin, `0..=ANALOG_MAX`
    fn analog_value(&self, pin: PinId) -> u16;
}

impl<I: InputSource + ?Sized> InputSource for &I {
    fn digital_state(&self, pin: PinId) -> bool {
        (**self).digital_state(pin)
    }

    fn analog_value(&self, pin: PinId) -> u16 {
        (**self).analog_value(pin)
    }
}

/// Raw output writes
///
/// Writes to unknown pin ids are ignored.
pub trait OutputSink {
    /// Drive a digital pin high or low
    fn set_digital(&self, pin: PinId, high: bool);

    /// Set a PWM duty cycle, `0..=255`
    fn set_analog(&self, pin: PinId, duty: u8);
}

impl<O: OutputSink + ?Sized> OutputSink for &O {
    fn set_digital(&self, pin: PinId, high: bool) {
        (**self).set_digital(pin, high)
    }

    fn set_analog(&self, pin: PinId, duty: u8) {
        (**self).set_analog(pin, duty)
    }
}

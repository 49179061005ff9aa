//! GPIO and PWM output sinks addressed by pin id

use core::cell::RefCell;

use cadence_hal::{OutputSink, PinId};
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use heapless::Vec;

use crate::inputs::RegisterError;

/// Maximum registered outputs of each kind
pub const MAX_OUTPUT_PINS: usize = 8;

/// Output pins and PWM channels keyed by pin id
///
/// `O` is any embedded-hal output pin (e.g. `embassy_rp::gpio::Output`),
/// `W` any duty-cycle channel (e.g. `embassy_rp::pwm::PwmOutput`).
pub struct Rp2040Outputs<O, W> {
    digital: RefCell<Vec<(PinId, O), MAX_OUTPUT_PINS>>,
    pwm: RefCell<Vec<(PinId, W), MAX_OUTPUT_PINS>>,
}

impl<O: OutputPin, W: SetDutyCycle> Rp2040Outputs<O, W> {
    /// No outputs registered
    pub const fn new() -> Self {
        Self {
            digital: RefCell::new(Vec::new()),
            pwm: RefCell::new(Vec::new()),
        }
    }

    /// Register a digital output under `id`
    pub fn add_digital(&mut self, id: PinId, pin: O) -> Result<(), RegisterError> {
        let pins = self.digital.get_mut();
        if pins.iter().any(|(existing, _)| *existing == id) {
            return Err(RegisterError::Duplicate);
        }
        pins.push((id, pin)).map_err(|_| RegisterError::Full)
    }

    /// Register a PWM channel under `id`
    pub fn add_pwm(&mut self, id: PinId, channel: W) -> Result<(), RegisterError> {
        let channels = self.pwm.get_mut();
        if channels.iter().any(|(existing, _)| *existing == id) {
            return Err(RegisterError::Duplicate);
        }
        channels
            .push((id, channel))
            .map_err(|_| RegisterError::Full)
    }
}

impl<O: OutputPin, W: SetDutyCycle> Default for Rp2040Outputs<O, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: OutputPin, W: SetDutyCycle> OutputSink for Rp2040Outputs<O, W> {
    fn set_digital(&self, pin: PinId, high: bool) {
        let mut pins = self.digital.borrow_mut();
        if let Some((_, out)) = pins.iter_mut().find(|(existing, _)| *existing == pin) {
            // Pin errors are infallible on RP2040
            let _ = out.set_state(high.into());
        }
    }

    fn set_analog(&self, pin: PinId, duty: u8) {
        let mut channels = self.pwm.borrow_mut();
        if let Some((_, ch)) = channels.iter_mut().find(|(existing, _)| *existing == pin) {
            let _ = ch.set_duty_cycle_fraction(u16::from(duty), u16::from(u8::MAX));
        }
    }
}

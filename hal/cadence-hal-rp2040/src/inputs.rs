//! GPIO and ADC input sources addressed by pin id
//!
//! Pins are handed over once at startup, tagged with the id the
//! configuration uses for them. Reads of ids that were never registered
//! return `false` / `0`.

use core::cell::RefCell;

use cadence_hal::{InputSource, PinId, ANALOG_MAX};
use embassy_rp::adc::{Adc, Blocking, Channel};
use embedded_hal::digital::InputPin;
use heapless::Vec;

/// Maximum registered digital inputs
pub const MAX_DIGITAL_PINS: usize = 8;

/// Maximum registered analog channels (the RP2040 has four external ones)
pub const MAX_ANALOG_PINS: usize = 4;

/// RP2040 ADC resolution is 12 bits; the shared domain is 10
const ADC_SHIFT: u32 = 2;

/// Error when registering a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError {
    /// Bank is full
    Full,
    /// Id already registered
    Duplicate,
}

/// Digital inputs keyed by pin id
pub struct DigitalBank<P> {
    pins: RefCell<Vec<(PinId, P), MAX_DIGITAL_PINS>>,
}

impl<P: InputPin> DigitalBank<P> {
    /// Empty bank
    pub const fn new() -> Self {
        Self {
            pins: RefCell::new(Vec::new()),
        }
    }

    /// Register a configured input pin under `id`
    pub fn add(&mut self, id: PinId, pin: P) -> Result<(), RegisterError> {
        let pins = self.pins.get_mut();
        if pins.iter().any(|(existing, _)| *existing == id) {
            return Err(RegisterError::Duplicate);
        }
        pins.push((id, pin)).map_err(|_| RegisterError::Full)
    }

    fn read(&self, id: PinId) -> bool {
        let mut pins = self.pins.borrow_mut();
        pins.iter_mut()
            .find(|(existing, _)| *existing == id)
            // A failed read is reported as low
            .map(|(_, pin)| pin.is_high().unwrap_or(false))
            .unwrap_or(false)
    }
}

impl<P: InputPin> Default for DigitalBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// ADC channels keyed by pin id
pub struct AnalogBank<'d> {
    adc: RefCell<Adc<'d, Blocking>>,
    channels: RefCell<Vec<(PinId, Channel<'d>), MAX_ANALOG_PINS>>,
}

impl<'d> AnalogBank<'d> {
    /// Bank reading through `adc`, no channels yet
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            adc: RefCell::new(adc),
            channels: RefCell::new(Vec::new()),
        }
    }

    /// Register an ADC channel under `id`
    pub fn add(&mut self, id: PinId, channel: Channel<'d>) -> Result<(), RegisterError> {
        let channels = self.channels.get_mut();
        if channels.iter().any(|(existing, _)| *existing == id) {
            return Err(RegisterError::Duplicate);
        }
        channels
            .push((id, channel))
            .map_err(|_| RegisterError::Full)
    }

    fn read(&self, id: PinId) -> u16 {
        let mut channels = self.channels.borrow_mut();
        let Some((_, channel)) = channels.iter_mut().find(|(existing, _)| *existing == id) else {
            return 0;
        };
        match self.adc.borrow_mut().blocking_read(channel) {
            Ok(raw) => (raw >> ADC_SHIFT).min(ANALOG_MAX),
            Err(_) => 0,
        }
    }
}

/// Combined RP2040 input source
pub struct Rp2040Inputs<'d, P> {
    pub digital: DigitalBank<P>,
    pub analog: AnalogBank<'d>,
}

impl<'d, P: InputPin> Rp2040Inputs<'d, P> {
    /// Empty digital bank plus an analog bank over `adc`
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            digital: DigitalBank::new(),
            analog: AnalogBank::new(adc),
        }
    }
}

impl<P: InputPin> InputSource for Rp2040Inputs<'_, P> {
    fn digital_state(&self, pin: PinId) -> bool {
        self.digital.read(pin)
    }

    fn analog_value(&self, pin: PinId) -> u16 {
        self.analog.read(pin)
    }
}

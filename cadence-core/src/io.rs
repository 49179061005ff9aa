//! Sensor and actuator primitives
//!
//! Inputs sample a pin once per `update()` and expose the filtered result;
//! outputs hold a requested state and write it on `update()`. Application
//! tasks call `update()` from their `tick()`.

use cadence_hal::{Millis, OutputSink, PinId, Platform, ANALOG_MAX};

use crate::timer::Timer;

/// Moving-average window of [`AnalogInput`]
pub const FILTER_SIZE: usize = 10;

/// PWM duty ceiling written by [`AnalogOutput`]
pub const PWM_MAX: u8 = u8::MAX;

/// Linear integer remap from `0..=in_max` to `0..=out_max`, truncating
fn remap(value: u32, in_max: u32, out_max: u32) -> u32 {
    if in_max == 0 {
        return 0;
    }
    value * out_max / in_max
}

/// Debounced digital input with edge detection
///
/// A rising level is reported only after the raw pin has read high
/// continuously for the threshold; a falling level is reported on the
/// first low read.
#[derive(Debug)]
pub struct DigitalInput<'a, P: ?Sized> {
    platform: &'a P,
    pin: PinId,
    debounce: Timer<'a, P>,
    value: bool,
    previous: bool,
    changed: bool,
}

impl<'a, P: Platform + ?Sized> DigitalInput<'a, P> {
    /// Input on `pin`, inactive until held high for `threshold_ms`
    pub fn new(platform: &'a P, pin: PinId, threshold_ms: Millis) -> Self {
        Self {
            platform,
            pin,
            debounce: Timer::new(platform, threshold_ms),
            value: false,
            previous: false,
            changed: false,
        }
    }

    /// Sample the pin and refresh the debounced value and edge flag
    pub fn update(&mut self) {
        self.debounce.active(self.platform.digital_state(self.pin));
        self.value = self.debounce.is_time_elapsed();
        self.changed = self.value != self.previous;
        self.previous = self.value;
    }

    /// Debounced level
    pub fn is_active(&self) -> bool {
        self.value
    }

    /// Debounced level differs from the previous update
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Rising edge on the last update
    pub fn is_pressed(&self) -> bool {
        self.changed && self.value
    }

    /// Sampled pin
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Change the hold time; a hold in progress keeps its start
    pub fn set_threshold(&mut self, threshold_ms: Millis) {
        self.debounce.set_time(threshold_ms);
    }
}

/// Analog input remapped to `0..=range` and smoothed by a moving average
///
/// Until the window has filled, the mean is taken over the samples seen so
/// far, so a cold start is not biased toward zero.
#[derive(Debug)]
pub struct AnalogInput<'a, P: ?Sized> {
    platform: &'a P,
    pin: PinId,
    range: u16,
    samples: [u16; FILTER_SIZE],
    filled: usize,
    cursor: usize,
    value: u16,
}

impl<'a, P: Platform + ?Sized> AnalogInput<'a, P> {
    /// Input on `pin` remapped to `0..=range`, window empty
    pub fn new(platform: &'a P, pin: PinId, range: u16) -> Self {
        Self {
            platform,
            pin,
            range,
            samples: [0; FILTER_SIZE],
            filled: 0,
            cursor: 0,
            value: 0,
        }
    }

    /// Sample, remap, push into the window and recompute the mean
    pub fn update(&mut self) {
        let raw = self.platform.analog_value(self.pin).min(ANALOG_MAX);
        let mapped = remap(u32::from(raw), u32::from(ANALOG_MAX), u32::from(self.range));
        self.push(mapped as u16);
    }

    fn push(&mut self, sample: u16) {
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % FILTER_SIZE;
        if self.filled < FILTER_SIZE {
            self.filled += 1;
        }
        let sum: u32 = self.samples[..self.filled]
            .iter()
            .map(|&s| u32::from(s))
            .sum();
        self.value = (sum / self.filled as u32) as u16;
    }

    /// Latest filtered value, `0..=range`
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Samples currently in the window
    pub fn sample_count(&self) -> usize {
        self.filled
    }

    /// Sampled pin
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Upper bound of the remapped value
    pub fn range(&self) -> u16 {
        self.range
    }
}

/// On/off output
#[derive(Debug)]
pub struct DigitalOutput<'a, O: ?Sized> {
    sink: &'a O,
    pin: PinId,
    value: bool,
}

impl<'a, O: OutputSink + ?Sized> DigitalOutput<'a, O> {
    /// Output starting off; nothing is written until `update()`
    pub fn new(sink: &'a O, pin: PinId) -> Self {
        Self {
            sink,
            pin,
            value: false,
        }
    }

    /// Request the high level
    pub fn turn_on(&mut self) {
        self.value = true;
    }

    /// Request the low level
    pub fn turn_off(&mut self) {
        self.value = false;
    }

    /// Request `on`
    pub fn set(&mut self, on: bool) {
        self.value = on;
    }

    /// Requested level
    pub fn is_active(&self) -> bool {
        self.value
    }

    /// Write the requested level to the pin
    pub fn update(&self) {
        self.sink.set_digital(self.pin, self.value);
    }
}

/// PWM output driven by a value in `0..=max`
#[derive(Debug)]
pub struct AnalogOutput<'a, O: ?Sized> {
    sink: &'a O,
    pin: PinId,
    max: u16,
    value: u16,
}

impl<'a, O: OutputSink + ?Sized> AnalogOutput<'a, O> {
    /// Output on `pin` taking values in `0..=max`, starting at 0
    pub fn new(sink: &'a O, pin: PinId, max: u16) -> Self {
        Self {
            sink,
            pin,
            max,
            value: 0,
        }
    }

    /// Request a value; anything above `max` is clamped
    pub fn set_value(&mut self, value: u16) {
        self.value = value.min(self.max);
    }

    /// Requested value, already clamped
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Value mapped to full duty
    pub fn max(&self) -> u16 {
        self.max
    }

    /// Duty the next `update()` writes
    pub fn duty(&self) -> u8 {
        remap(u32::from(self.value), u32::from(self.max), u32::from(PWM_MAX)) as u8
    }

    /// Write the value to the pin as a PWM duty
    pub fn update(&self) {
        self.sink.set_analog(self.pin, self.duty());
    }
}

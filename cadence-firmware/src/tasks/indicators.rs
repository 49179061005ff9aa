//! Output refresh task
//!
//! Incoming slot 0 forces the LED on, slot 1 sets the dimmer in percent.
//! Without host input the LED follows the button.

use cadence_core::config::OutputsConfig;
use cadence_core::{AnalogOutput, DigitalOutput, Task, TaskTiming};
use cadence_hal::{ByteStream, OutputSink};
use cadence_protocol::SerialManager;

use super::sensors::SensorValues;

/// Incoming slot holding the LED override
pub const LED_SLOT: u8 = 0;

/// Incoming slot holding the dimmer level
pub const DIMMER_SLOT: u8 = 1;

/// Dimmer scale
const DIMMER_MAX: u16 = 100;

pub struct IndicatorTask<'t, 'a, O, S> {
    timing: TaskTiming,
    led: DigitalOutput<'t, O>,
    dimmer: AnalogOutput<'t, O>,
    values: &'t SensorValues,
    manager: &'t SerialManager<'a, S>,
}

impl<'t, 'a, O: OutputSink, S: ByteStream> IndicatorTask<'t, 'a, O, S> {
    /// Inert task driving the pins named in `config` through `sink`
    pub fn new(
        sink: &'t O,
        config: OutputsConfig,
        values: &'t SensorValues,
        manager: &'t SerialManager<'a, S>,
    ) -> Self {
        Self {
            timing: TaskTiming::new(),
            led: DigitalOutput::new(sink, config.led_pin),
            dimmer: AnalogOutput::new(sink, config.dimmer_pin, DIMMER_MAX),
            values,
            manager,
        }
    }
}

impl<O: OutputSink, S: ByteStream> Task for IndicatorTask<'_, '_, O, S> {
    fn tick(&mut self) {
        let host_led = self.manager.incoming(LED_SLOT).unwrap_or(0) != 0;
        self.led.set(host_led || self.values.pressed.get() != 0);
        self.led.update();

        let level = self.manager.incoming(DIMMER_SLOT).unwrap_or(0).max(0);
        self.dimmer.set_value(level.unsigned_abs());
        self.dimmer.update();
    }

    fn reset(&mut self) {
        self.led.turn_off();
        self.dimmer.set_value(0);
    }

    fn timing(&self) -> &TaskTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut TaskTiming {
        &mut self.timing
    }
}

//! Input sampling task

use core::cell::{Cell, RefCell};

use cadence_core::config::InputsConfig;
use cadence_core::{AnalogInput, DigitalInput, Task, TaskTiming};
use cadence_hal::{ByteStream, Platform};
use cadence_protocol::{SerialManager, Text};
use defmt::*;

/// Values published to the host, in registration order
pub struct SensorValues {
    /// Debounced button level, 0 or 1
    pub pressed: Cell<u8>,
    /// Filtered analog level, `0..=analog_range`
    pub level: Cell<i16>,
    /// Human-readable button state
    pub state: RefCell<Text>,
}

impl SensorValues {
    /// Released button, zero level, state "idle"
    pub fn new() -> Self {
        let mut state = Text::new();
        let _ = state.push_str("idle");
        Self {
            pressed: Cell::new(0),
            level: Cell::new(0),
            state: RefCell::new(state),
        }
    }
}

impl Default for SensorValues {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples the button and the analog sensor once per period
pub struct SensorTask<'t, 'a, P, S> {
    timing: TaskTiming,
    button: DigitalInput<'t, P>,
    level: AnalogInput<'t, P>,
    values: &'t SensorValues,
    manager: &'t SerialManager<'a, S>,
}

impl<'t, 'a, P: Platform, S: ByteStream> SensorTask<'t, 'a, P, S> {
    /// Inert task sampling the pins named in `config`
    pub fn new(
        platform: &'t P,
        config: InputsConfig,
        values: &'t SensorValues,
        manager: &'t SerialManager<'a, S>,
    ) -> Self {
        Self {
            timing: TaskTiming::new(),
            button: DigitalInput::new(platform, config.button_pin, config.button_debounce_ms),
            level: AnalogInput::new(platform, config.analog_pin, config.analog_range),
            values,
            manager,
        }
    }

    fn set_state(&self, label: &str) {
        // Skip the update if a send is reading the text right now
        if let Ok(mut state) = self.values.state.try_borrow_mut() {
            state.clear();
            let _ = state.push_str(label);
        }
    }
}

impl<P: Platform, S: ByteStream> Task for SensorTask<'_, '_, P, S> {
    fn tick(&mut self) {
        self.button.update();
        self.level.update();

        let pressed = self.button.is_active();
        self.values.pressed.set(u8::from(pressed));
        self.values
            .level
            .set(i16::try_from(self.level.value()).unwrap_or(i16::MAX));

        if self.button.is_changed() {
            if pressed {
                self.set_state("pressed");
                self.manager.add_event("button pressed");
            } else {
                self.set_state("released");
                self.manager.add_debug("button released");
            }
            debug!("button {}", if pressed { "pressed" } else { "released" });
        }
    }

    fn timing(&self) -> &TaskTiming {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut TaskTiming {
        &mut self.timing
    }
}

//! Runtime configuration types
//!
//! Defaults match the reference controller wiring: 50 ms base tick,
//! host output every 250 ms, host input every 500 ms, 9600 baud.

use cadence_hal::{Millis, PinId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scheduler timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Base tick period (ms); every task period should be a multiple
    pub base_period_ms: Millis,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { base_period_ms: 50 }
    }
}

/// Host link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// UART baud rate
    pub baud_rate: u32,
    /// Period of the outgoing batch task (ms)
    pub output_period_ms: Millis,
    /// Period of the incoming command task (ms)
    pub input_period_ms: Millis,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            output_period_ms: 250,
            input_period_ms: 500,
        }
    }
}

/// Sampled inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputsConfig {
    /// Period of the input sampling task (ms)
    pub sample_period_ms: Millis,
    /// Push-button pin
    pub button_pin: PinId,
    /// Hold time before the button reads as pressed (ms)
    pub button_debounce_ms: Millis,
    /// Analog sensor pin
    pub analog_pin: PinId,
    /// Upper bound of the remapped analog value
    pub analog_range: u16,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 50,
            button_pin: 2,
            button_debounce_ms: 250,
            analog_pin: 26,
            analog_range: 100,
        }
    }
}

/// Driven outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputsConfig {
    /// Period of the output refresh task (ms)
    pub refresh_period_ms: Millis,
    /// Indicator LED pin
    pub led_pin: PinId,
    /// PWM pin whose duty the host sets through incoming slot 1
    pub dimmer_pin: PinId,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            refresh_period_ms: 100,
            led_pin: 25,
            dimmer_pin: 15,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuntimeConfig {
    pub scheduler: SchedulerConfig,
    pub serial: SerialConfig,
    pub inputs: InputsConfig,
    pub outputs: OutputsConfig,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Malformed or unknown section header (1-based line)
    InvalidSection { line: u16 },
    /// Unknown key, or a key outside any section
    InvalidKey { line: u16 },
    /// Value is not an integer in range for its key
    InvalidValue { line: u16 },
    /// Base period or a task period is zero
    ZeroPeriod,
    /// A task period is not a multiple of the base period
    PeriodNotMultiple { period_ms: Millis },
}

impl RuntimeConfig {
    /// Task periods in registration order: output, input, sampling, refresh
    pub fn task_periods(&self) -> [Millis; 4] {
        [
            self.serial.output_period_ms,
            self.serial.input_period_ms,
            self.inputs.sample_period_ms,
            self.outputs.refresh_period_ms,
        ]
    }

    /// Check the timing relationships the scheduler relies on
    ///
    /// The scheduler itself accepts any period; a period that is not a
    /// multiple of the base fires late by the remainder every cycle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.scheduler.base_period_ms;
        if base == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        for period_ms in self.task_periods() {
            if period_ms == 0 {
                return Err(ConfigError::ZeroPeriod);
            }
            if period_ms % base != 0 {
                return Err(ConfigError::PeriodNotMultiple { period_ms });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RuntimeConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.scheduler.base_period_ms, 50);
        assert_eq!(config.task_periods(), [250, 500, 50, 100]);
        assert_eq!(config.serial.baud_rate, 9600);
    }

    #[test]
    fn test_validate_rejects_bad_periods() {
        let mut config = RuntimeConfig::default();
        config.outputs.refresh_period_ms = 75;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodNotMultiple { period_ms: 75 })
        );

        let mut config = RuntimeConfig::default();
        config.serial.input_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod));

        let mut config = RuntimeConfig::default();
        config.scheduler.base_period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod));
    }
}

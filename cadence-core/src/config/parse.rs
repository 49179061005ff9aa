//! Minimal TOML reader for the controller configuration
//!
//! Handles only the subset `controller.toml` uses, without allocation:
//! - `[section]` headers
//! - `key = integer` pairs (decimal, `_` separators allowed)
//! - Comments (`# ...`), whole-line or trailing
//!
//! Keys not set keep their default. Unknown sections and keys are errors,
//! so a typo cannot silently fall back to a default.

use super::types::{ConfigError, RuntimeConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scheduler,
    Serial,
    Inputs,
    Outputs,
}

/// Parse configuration text, starting from the defaults
pub fn parse_config(input: &str) -> Result<RuntimeConfig, ConfigError> {
    let mut config = RuntimeConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection { line: line_no })?;
            section = parse_section(name.trim())
                .ok_or(ConfigError::InvalidSection { line: line_no })?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::InvalidKey { line: line_no })?;
        let value =
            parse_integer(value.trim()).ok_or(ConfigError::InvalidValue { line: line_no })?;
        apply(&mut config, section, key.trim(), value, line_no)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section(name: &str) -> Option<Section> {
    match name {
        "scheduler" => Some(Section::Scheduler),
        "serial" => Some(Section::Serial),
        "inputs" => Some(Section::Inputs),
        "outputs" => Some(Section::Outputs),
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    let mut digits = 0;
    for c in text.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10)?;
        value = value.checked_mul(10)?.checked_add(digit)?;
        digits += 1;
    }
    (digits > 0).then_some(value)
}

fn narrow<T: TryFrom<u32>>(value: u32, line: u16) -> Result<T, ConfigError> {
    T::try_from(value).map_err(|_| ConfigError::InvalidValue { line })
}

fn apply(
    config: &mut RuntimeConfig,
    section: Section,
    key: &str,
    value: u32,
    line: u16,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Scheduler, "base_period_ms") => config.scheduler.base_period_ms = value,

        (Section::Serial, "baud_rate") => config.serial.baud_rate = value,
        (Section::Serial, "output_period_ms") => config.serial.output_period_ms = value,
        (Section::Serial, "input_period_ms") => config.serial.input_period_ms = value,

        (Section::Inputs, "sample_period_ms") => config.inputs.sample_period_ms = value,
        (Section::Inputs, "button_pin") => config.inputs.button_pin = narrow(value, line)?,
        (Section::Inputs, "button_debounce_ms") => config.inputs.button_debounce_ms = value,
        (Section::Inputs, "analog_pin") => config.inputs.analog_pin = narrow(value, line)?,
        (Section::Inputs, "analog_range") => config.inputs.analog_range = narrow(value, line)?,

        (Section::Outputs, "refresh_period_ms") => config.outputs.refresh_period_ms = value,
        (Section::Outputs, "led_pin") => config.outputs.led_pin = narrow(value, line)?,
        (Section::Outputs, "dimmer_pin") => config.outputs.dimmer_pin = narrow(value, line)?,

        _ => return Err(ConfigError::InvalidKey { line }),
    }
    Ok(())
}

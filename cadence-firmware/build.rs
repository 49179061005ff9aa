//! Build script for cadence-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates controller.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section
const SECTIONS: &[(&str, &[&str])] = &[
    ("scheduler", &["base_period_ms"]),
    ("serial", &["baud_rate", "output_period_ms", "input_period_ms"]),
    (
        "inputs",
        &[
            "sample_period_ms",
            "button_pin",
            "button_debounce_ms",
            "analog_pin",
            "analog_range",
        ],
    ),
    ("outputs", &["refresh_period_ms", "led_pin", "dimmer_pin"]),
];

/// Task periods checked against the base period
const TASK_PERIODS: &[(&str, &str)] = &[
    ("serial", "output_period_ms"),
    ("serial", "input_period_ms"),
    ("inputs", "sample_period_ms"),
    ("outputs", "refresh_period_ms"),
];

/// RP2040 user GPIOs
const GPIO_COUNT: i64 = 30;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate controller.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=controller.toml");

    let config_path = Path::new("controller.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: controller.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds controller.toml at build time.              ║\n\
            ║  Please create one in the cadence-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read controller.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in controller.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_periods(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid controller configuration                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=controller.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn integer(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Only known sections and keys, every value a non-negative integer
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some(keys) = SECTIONS
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, keys)| *keys)
        else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for (key, value) in table {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
                continue;
            }
            match value.as_integer() {
                Some(v) if v >= 0 && v <= i64::from(u32::MAX) => {}
                Some(_) => errors.push(format!("[{}] {} out of range", name, key)),
                None => errors.push(format!("[{}] {} must be an integer", name, key)),
            }
        }
    }
}

/// Task periods are non-zero multiples of the base period
fn validate_periods(config: &toml::Value, errors: &mut Vec<String>) {
    let base = integer(config, "scheduler", "base_period_ms").unwrap_or(50);
    if base <= 0 {
        errors.push("[scheduler] base_period_ms must be > 0".to_string());
        return;
    }

    for (section, key) in TASK_PERIODS {
        if let Some(period) = integer(config, section, key) {
            if period <= 0 {
                errors.push(format!("[{}] {} must be > 0", section, key));
            } else if period % base != 0 {
                errors.push(format!(
                    "[{}] {} must be a multiple of {} ms",
                    section, key, base
                ));
            }
        }
    }

    if integer(config, "serial", "baud_rate") == Some(0) {
        errors.push("[serial] baud_rate must be > 0".to_string());
    }
}

/// Pins exist on the RP2040 and the analog pin is ADC-capable
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    for (section, key) in [
        ("inputs", "button_pin"),
        ("inputs", "analog_pin"),
        ("outputs", "led_pin"),
        ("outputs", "dimmer_pin"),
    ] {
        if let Some(pin) = integer(config, section, key) {
            if pin >= GPIO_COUNT {
                errors.push(format!("[{}] {} must be 0-{}", section, key, GPIO_COUNT - 1));
            }
        }
    }

    if let Some(pin) = integer(config, "inputs", "analog_pin") {
        if !(26..=29).contains(&pin) {
            errors.push("[inputs] analog_pin must be an ADC pin (26-29)".to_string());
        }
    }

    if let Some(range) = integer(config, "inputs", "analog_range") {
        if range > i64::from(u16::MAX) {
            errors.push("[inputs] analog_range must fit in 16 bits".to_string());
        }
    }
}

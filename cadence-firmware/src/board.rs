//! Board wiring
//!
//! Pin assignments are board-specific (Raspberry Pi Pico: button on
//! GPIO2, potentiometer on GPIO26/ADC0, on-board LED on GPIO25, dimmer LED
//! on GPIO15/PWM7B, host link on UART0 GPIO0/GPIO1). The configuration
//! names pins by GPIO number; a configured pin that is not wired here
//! reads low / zero and is reported at startup.

use cadence_core::config::RuntimeConfig;
use cadence_hal::stream::{DataBits, Parity, StopBits};
use cadence_hal::{PinId, UartConfig};
use defmt::*;
use embassy_rp::uart;

pub const BUTTON_PIN: PinId = 2;
pub const ANALOG_PIN: PinId = 26;
pub const LED_PIN: PinId = 25;
pub const DIMMER_PIN: PinId = 15;

/// Warn about configured pins this board does not wire
pub fn check_pins(config: &RuntimeConfig) {
    let pins = [
        ("button", config.inputs.button_pin, BUTTON_PIN),
        ("analog", config.inputs.analog_pin, ANALOG_PIN),
        ("led", config.outputs.led_pin, LED_PIN),
        ("dimmer", config.outputs.dimmer_pin, DIMMER_PIN),
    ];
    for (name, configured, wired) in pins {
        if configured != wired {
            warn!(
                "{} configured on GPIO{} but wired to GPIO{}",
                name, configured, wired
            );
        }
    }
}

/// Translate the shared UART settings to the embassy-rp config
pub fn uart_config(config: &UartConfig) -> uart::Config {
    let mut rp = uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    rp
}

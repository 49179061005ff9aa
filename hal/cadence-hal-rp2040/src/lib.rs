//! RP2040-specific capability sources for Cadence firmware
//!
//! This crate provides the hardware implementations of the shared
//! `cadence-hal` traits:
//!
//! - [`Rp2040Clock`] - embassy-time monotonic clock
//! - [`Rp2040Inputs`] - GPIO inputs and ADC channels addressed by pin id
//! - [`Rp2040Outputs`] - GPIO outputs and PWM channels addressed by pin id
//! - [`Rp2040Platform`] - clock and inputs as one `Platform`
//!
//! The serial link uses `cadence_hal::IoStream` over an embassy buffered
//! UART, so no UART type lives here.

#![no_std]

pub mod clock;
pub mod inputs;
pub mod outputs;
pub mod platform;

pub use clock::Rp2040Clock;
pub use inputs::{
    AnalogBank, DigitalBank, RegisterError, Rp2040Inputs, MAX_ANALOG_PINS, MAX_DIGITAL_PINS,
};
pub use outputs::{Rp2040Outputs, MAX_OUTPUT_PINS};
pub use platform::Rp2040Platform;

// Re-export shared traits from cadence-hal for convenience
pub use cadence_hal::{Clock, InputSource, OutputSink, PinId};

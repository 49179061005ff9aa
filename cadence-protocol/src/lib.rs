//! Cadence host link protocol
//!
//! This crate publishes live variables, debug text and events from a
//! controller to a host over any [`cadence_hal::ByteStream`], and ingests
//! the host's commands into a couple of incoming slots.
//!
//! # Protocol Overview
//!
//! The host opens the link by sending `0xFF`; the device answers `0x0A`
//! once. After that the device periodically sends a batch:
//! ```text
//! ┌──────┬──────┬───────┬─────────────────────────────────────────┐
//! │ 0xFF │ 0x00 │ COUNT │ COUNT x (KIND, VALUE KIND, ID, LEN, ..) │
//! │ 1B   │ 1B   │ 1B    │ 4B header + LEN payload bytes each      │
//! └──────┴──────┴───────┴─────────────────────────────────────────┘
//! ```
//! and the host may send commands:
//! ```text
//! ┌──────┬──────┬────┬─────┬──────────────────────────┐
//! │ 0xFF │ 0x00 │ ID │ LEN │ LEN bytes (LE i16 first) │
//! └──────┴──────┴────┴─────┴──────────────────────────┘
//! ```
//!
//! [`SerialManager`] is the device-side facade; [`host`] holds the
//! matching host-side decoder and encoders.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod host;
pub mod link;
pub mod manager;
pub mod register;
pub mod wire;

pub use command::{Command, CommandParser};
pub use host::{encode_command, encode_handshake, BatchDecoder, DecodeError, Message, Value};
pub use link::{Link, MAX_BYTES_PER_POLL};
pub use manager::SerialManager;
pub use register::{Entry, Register, Text, Variable};
pub use wire::{MessageKind, ValueKind};

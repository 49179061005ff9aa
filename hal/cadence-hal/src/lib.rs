//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the capability traits that the scheduler, timing
//! primitives and protocol are written against. Chip-specific crates
//! provide the real implementations; the [`mock`] module provides
//! deterministic ones for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (cadence-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-core / cadence-protocol        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ cadence-hal-  │       │  hal::mock    │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`clock::Clock`] - Monotonic millisecond time
//! - [`gpio::InputSource`], [`gpio::OutputSink`] - Raw pin access by id
//! - [`stream::ByteStream`] - Byte-oriented serial transport
//! - [`Platform`] - Clock + inputs, the bundle most primitives need

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod io;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod stream;

// Re-export key traits at crate root for convenience
pub use clock::{elapsed_ms, is_reached, Clock, Millis};
pub use gpio::{InputSource, OutputSink, PinId, ANALOG_MAX};
pub use io::IoStream;
pub use stream::{ByteStream, UartConfig};

/// Time and input capabilities in one bundle
///
/// Primitives that need both a clock and raw pin reads take a single
/// `&impl Platform` instead of two references.
pub trait Platform: Clock + InputSource {}

// Blanket implementation
impl<T: Clock + InputSource + ?Sized> Platform for T {}

//! Monotonic clock backed by the embassy time driver

use cadence_hal::{Clock, Millis};
use embassy_time::Instant;

/// Milliseconds since boot from the RP2040 timer peripheral
///
/// Requires the `time-driver` feature of `embassy-rp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rp2040Clock;

impl Rp2040Clock {
    /// Clock handle; the time driver must already be running
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for Rp2040Clock {
    fn now_ms(&self) -> Millis {
        // Truncation is the documented u32 wrap
        Instant::now().as_millis() as Millis
    }
}

//! Byte-stream transport abstractions
//!
//! The protocol layer talks to the host through [`ByteStream`]: a
//! non-blocking byte source paired with a blocking sink. Reads never wait,
//! so a scheduler pass is never stalled by a quiet host.

/// Serial byte stream
///
/// Mirrors a UART with a receive FIFO: `read_byte` pops one buffered byte
/// if there is one, writes block until the data has been queued.
pub trait ByteStream {
    /// Error type for stream operations
    type Error;

    /// Pop one received byte, `Ok(None)` when nothing is buffered
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write all of `data`
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Block until previously written data has left the device
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_all(&[byte])
    }

    /// Whether the underlying transport is usable
    ///
    /// Transports without a notion of liveness are always open.
    fn is_open(&self) -> bool {
        true
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    type Error = S::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

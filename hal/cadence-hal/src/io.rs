//! [`ByteStream`] adapter for `embedded-io` transports
//!
//! Any blocking transport implementing `embedded_io::{Read, ReadReady,
//! Write}` (embassy buffered UARTs, USB CDC-ACM classes, ...) becomes a
//! protocol stream by wrapping it in [`IoStream`].

use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};

use crate::stream::ByteStream;

/// Wraps an `embedded-io` transport
#[derive(Debug)]
pub struct IoStream<T> {
    inner: T,
}

impl<T> IoStream<T> {
    /// Wrap a transport
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ByteStream for IoStream<T>
where
    T: Read + ReadReady + Write,
{
    type Error = ErrorKind;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready().map_err(|e| e.kind())? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf).map_err(|e| e.kind())? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).map_err(|e| e.kind())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(|e| e.kind())
    }
}

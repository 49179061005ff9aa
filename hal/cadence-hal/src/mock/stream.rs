use core::cell::{Cell, RefCell};

use heapless::{Deque, Vec};

use crate::stream::ByteStream;

/// Bytes the host side can queue before the device reads them
pub const MOCK_RX_CAPACITY: usize = 256;

/// Bytes the device can write before the test drains them
pub const MOCK_TX_CAPACITY: usize = 1024;

/// Errors the mock stream can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockStreamError {
    /// Transmit buffer is full
    TxFull,
    /// Write failure requested by the test
    Injected,
}

/// In-memory serial link
///
/// The test plays the host: it queues bytes with [`MockStream::push_rx`]
/// and inspects what the device wrote with [`MockStream::take_tx`].
/// [`ByteStream`] is implemented for `&MockStream`, so the device side can
/// own a reference while the test keeps another.
#[derive(Debug)]
pub struct MockStream {
    rx: RefCell<Deque<u8, MOCK_RX_CAPACITY>>,
    tx: RefCell<Vec<u8, MOCK_TX_CAPACITY>>,
    open: Cell<bool>,
    fail_writes: Cell<bool>,
    flushes: Cell<u32>,
}

impl Default for MockStream {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStream {
    /// Open, empty link
    pub fn new() -> Self {
        Self {
            rx: RefCell::new(Deque::new()),
            tx: RefCell::new(Vec::new()),
            open: Cell::new(true),
            fail_writes: Cell::new(false),
            flushes: Cell::new(0),
        }
    }

    /// Queue bytes for the device to read; bytes past capacity are dropped
    pub fn push_rx(&self, bytes: &[u8]) {
        let mut rx = self.rx.borrow_mut();
        for &b in bytes {
            if rx.push_back(b).is_err() {
                break;
            }
        }
    }

    /// Bytes still waiting to be read by the device
    pub fn rx_pending(&self) -> usize {
        self.rx.borrow().len()
    }

    /// Drain everything the device has written so far
    pub fn take_tx(&self) -> Vec<u8, MOCK_TX_CAPACITY> {
        core::mem::take(&mut *self.tx.borrow_mut())
    }

    /// Mark the transport open or closed
    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of flush calls seen
    pub fn flush_count(&self) -> u32 {
        self.flushes.get()
    }
}

impl ByteStream for &MockStream {
    type Error = MockStreamError;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.rx.borrow_mut().pop_front())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(MockStreamError::Injected);
        }
        self.tx
            .borrow_mut()
            .extend_from_slice(data)
            .map_err(|_| MockStreamError::TxFull)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

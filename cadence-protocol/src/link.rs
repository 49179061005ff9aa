//! Framing over a byte stream: handshake, outgoing batches, incoming commands

use cadence_hal::ByteStream;

use crate::command::{Command, CommandParser};
use crate::register::{Entry, Register};
use crate::wire::{CMD_INIT, ENTRY_HEADER_SIZE, HANDSHAKE_ACK, SYNC};

/// Upper bound on bytes consumed by one handshake attempt or command poll
///
/// Keeps a chattering host from stalling a scheduler pass.
pub const MAX_BYTES_PER_POLL: usize = 64;

/// Protocol endpoint on the device side
pub struct Link<S> {
    stream: S,
    handshake_done: bool,
    parser: CommandParser,
}

impl<S: ByteStream> Link<S> {
    /// Link over `stream`, handshake pending
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            handshake_done: false,
            parser: CommandParser::new(),
        }
    }

    /// Handshake completed and the transport is still usable
    pub fn is_connected(&self) -> bool {
        self.handshake_done && self.stream.is_open()
    }

    /// Whether the host's handshake request has ever been seen
    pub fn handshake_done(&self) -> bool {
        self.handshake_done
    }

    /// Borrow the stream
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Mutably borrow the stream
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Give the stream back
    pub fn into_stream(self) -> S {
        self.stream
    }

    /// Look for the host's handshake request and acknowledge it
    ///
    /// Bytes before the request are discarded. Returns whether the link is
    /// connected afterwards.
    pub fn try_handshake(&mut self) -> Result<bool, S::Error> {
        if !self.stream.is_open() {
            return Ok(false);
        }
        if self.handshake_done {
            return Ok(true);
        }
        for _ in 0..MAX_BYTES_PER_POLL {
            match self.stream.read_byte()? {
                Some(SYNC) => {
                    self.stream.write_byte(HANDSHAKE_ACK)?;
                    self.handshake_done = true;
                    #[cfg(feature = "defmt")]
                    defmt::info!("host handshake complete");
                    return Ok(true);
                }
                Some(_) => {}
                None => break,
            }
        }
        Ok(false)
    }

    /// Write one batch: init frame, then every entry of the register
    pub fn send_batch(&mut self, register: &Register<'_>) -> Result<(), S::Error> {
        self.stream.flush()?;
        self.stream
            .write_all(&[SYNC, CMD_INIT, register.entry_count()])?;
        let stream = &mut self.stream;
        register.for_each_entry(|entry| write_entry(stream, entry))
    }

    /// Consume pending host bytes and store decoded values in the register
    ///
    /// Returns the number of commands applied.
    pub fn poll_commands(&mut self, register: &Register<'_>) -> Result<usize, S::Error> {
        let mut applied = 0;
        for _ in 0..MAX_BYTES_PER_POLL {
            let Some(byte) = self.stream.read_byte()? else {
                break;
            };
            if let Some(Command::SetIncoming { id, value }) = self.parser.feed(byte) {
                if register.set_incoming(id, value) {
                    applied += 1;
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("dropping value for invalid slot {=u8}", id);
                }
            }
        }
        Ok(applied)
    }
}

fn write_entry<S: ByteStream>(stream: &mut S, entry: &Entry<'_>) -> Result<(), S::Error> {
    let header: [u8; ENTRY_HEADER_SIZE] = [
        entry.kind as u8,
        entry.value_kind as u8,
        entry.id,
        entry.wire_len(),
    ];
    stream.write_all(&header)?;
    stream.write_all(entry.data)?;
    if entry.nul {
        stream.write_byte(0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_hal::mock::MockStream;
    use core::cell::Cell;

    #[test]
    fn test_handshake_waits_for_sync() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);

        assert_eq!(link.try_handshake(), Ok(false));
        wire.push_rx(&[0x01, 0x02]);
        assert_eq!(link.try_handshake(), Ok(false));
        assert!(wire.take_tx().is_empty());

        wire.push_rx(&[0x03, 0xFF, 0x04]);
        assert_eq!(link.try_handshake(), Ok(true));
        assert_eq!(wire.take_tx().as_slice(), &[HANDSHAKE_ACK]);
        // Byte after the request is left for the command parser
        assert_eq!(wire.rx_pending(), 1);

        // Acknowledged once only
        wire.push_rx(&[0xFF]);
        assert_eq!(link.try_handshake(), Ok(true));
        assert!(wire.take_tx().is_empty());
    }

    #[test]
    fn test_closed_stream_not_connected() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);
        wire.push_rx(&[0xFF]);
        link.try_handshake().unwrap();
        assert!(link.is_connected());

        wire.set_open(false);
        assert!(!link.is_connected());
        assert!(link.handshake_done());
        assert_eq!(link.try_handshake(), Ok(false));

        wire.set_open(true);
        assert!(link.is_connected());
    }

    #[test]
    fn test_batch_layout() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);
        let level = Cell::new(0x0102i16);
        let register = Register::new();
        register.add_int(&level);
        register.add_event("hi");

        link.send_batch(&register).unwrap();
        assert_eq!(
            wire.take_tx().as_slice(),
            &[
                0xFF, 0x00, 2, // init
                0, 1, 0, 2, 0x02, 0x01, // int variable
                2, 2, 0, 3, b'h', b'i', 0, // event
            ]
        );
        assert_eq!(wire.flush_count(), 1);
    }

    #[test]
    fn test_batch_write_failure_propagates() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);
        let register = Register::new();
        wire.fail_writes(true);
        assert!(link.send_batch(&register).is_err());
    }

    #[test]
    fn test_poll_applies_commands() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);
        let register = Register::new();

        wire.push_rx(&[0xFF, 0x00, 0x00, 0x02, 0x34, 0x12, 0xFF, 0x00, 0x05, 0x02, 0x01, 0x00]);
        assert_eq!(link.poll_commands(&register), Ok(1));
        assert_eq!(register.incoming(0), Some(0x1234));
        assert_eq!(register.incoming(1), Some(0));
    }

    #[test]
    fn test_poll_is_bounded() {
        let wire = MockStream::new();
        let mut link = Link::new(&wire);
        let register = Register::new();
        wire.push_rx(&[0x11; 100]);
        link.poll_commands(&register).unwrap();
        assert_eq!(wire.rx_pending(), 100 - MAX_BYTES_PER_POLL);
    }
}

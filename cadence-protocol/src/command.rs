//! Incoming command parsing
//!
//! Host frames arrive a few bytes at a time, so the parser is a state
//! machine fed one byte at a time. A frame split across two polls resumes
//! where it left off.

use crate::wire::{CMD_SET_INCOMING, SYNC};

/// A decoded host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Store `value` in incoming slot `id`
    SetIncoming { id: u8, value: i16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForSync,
    WaitingForCommand,
    WaitingForId,
    WaitingForLength,
    ReadingPayload,
}

/// State machine for parsing host command frames
///
/// Bytes outside a frame are skipped until the next sync byte. A sync
/// byte where a command byte is expected is treated as a fresh sync.
#[derive(Debug, Clone)]
pub struct CommandParser {
    state: ParseState,
    id: u8,
    remaining: u8,
    received: u8,
    value: [u8; 2],
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    /// Parser waiting for a sync byte
    pub const fn new() -> Self {
        Self {
            state: ParseState::WaitingForSync,
            id: 0,
            remaining: 0,
            received: 0,
            value: [0; 2],
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the parser is between frames
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForSync
    }

    /// Feed a single byte
    ///
    /// Returns a command once its last payload byte has been consumed.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            ParseState::WaitingForSync => {
                if byte == SYNC {
                    self.state = ParseState::WaitingForCommand;
                }
                None
            }
            ParseState::WaitingForCommand => {
                match byte {
                    CMD_SET_INCOMING => self.state = ParseState::WaitingForId,
                    SYNC => {}
                    _ => {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("dropping unknown command {=u8:#x}", byte);
                        self.reset();
                    }
                }
                None
            }
            ParseState::WaitingForId => {
                self.id = byte;
                self.state = ParseState::WaitingForLength;
                None
            }
            ParseState::WaitingForLength => {
                self.remaining = byte;
                self.received = 0;
                self.value = [0; 2];
                if byte == 0 {
                    self.finish()
                } else {
                    self.state = ParseState::ReadingPayload;
                    None
                }
            }
            ParseState::ReadingPayload => {
                // Bytes past the second are consumed and ignored
                if let Some(slot) = self.value.get_mut(usize::from(self.received)) {
                    *slot = byte;
                }
                self.received = self.received.saturating_add(1);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.finish()
                } else {
                    None
                }
            }
        }
    }

    fn finish(&mut self) -> Option<Command> {
        let id = self.id;
        let complete = usize::from(self.received) >= self.value.len();
        let value = i16::from_le_bytes(self.value);
        self.reset();
        if complete {
            Some(Command::SetIncoming { id, value })
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("dropping short frame for slot {=u8}", id);
            None
        }
    }

    /// Feed several bytes, returning the first complete command
    ///
    /// Bytes after that command are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<Command>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(command) = self.feed(byte) {
                return (Some(command), i + 1);
            }
        }
        (None, bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_incoming_decodes_little_endian() {
        let mut parser = CommandParser::new();
        let (command, used) = parser.feed_bytes(&[0xFF, 0x00, 0x01, 0x02, 0x34, 0x12]);
        assert_eq!(command, Some(Command::SetIncoming { id: 1, value: 0x1234 }));
        assert_eq!(used, 6);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_negative_value() {
        let mut parser = CommandParser::new();
        let (command, _) = parser.feed_bytes(&[0xFF, 0x00, 0x00, 0x02, 0xFE, 0xFF]);
        assert_eq!(command, Some(Command::SetIncoming { id: 0, value: -2 }));
    }

    #[test]
    fn test_extra_payload_consumed() {
        let mut parser = CommandParser::new();
        let (command, used) =
            parser.feed_bytes(&[0xFF, 0x00, 0x00, 0x04, 0x0A, 0x00, 0xFF, 0xFF, 0x42]);
        assert_eq!(command, Some(Command::SetIncoming { id: 0, value: 10 }));
        // The two 0xFF payload bytes were not taken as sync
        assert_eq!(used, 8);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_split_across_feeds() {
        let mut parser = CommandParser::new();
        assert_eq!(parser.feed_bytes(&[0xFF, 0x00, 0x01]).0, None);
        assert!(!parser.is_idle());
        assert_eq!(
            parser.feed_bytes(&[0x02, 0x05, 0x00]).0,
            Some(Command::SetIncoming { id: 1, value: 5 })
        );
    }

    #[test]
    fn test_garbage_before_sync_skipped() {
        let mut parser = CommandParser::new();
        let (command, _) = parser.feed_bytes(&[0x00, 0x13, 0x37, 0xFF, 0x00, 0x00, 0x02, 0x01, 0x00]);
        assert_eq!(command, Some(Command::SetIncoming { id: 0, value: 1 }));
    }

    #[test]
    fn test_unknown_command_discarded() {
        let mut parser = CommandParser::new();
        assert_eq!(parser.feed_bytes(&[0xFF, 0x07, 0x00, 0x02, 0x01, 0x00]).0, None);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_repeated_sync_resyncs() {
        let mut parser = CommandParser::new();
        let (command, _) = parser.feed_bytes(&[0xFF, 0xFF, 0xFF, 0x00, 0x01, 0x02, 0x09, 0x00]);
        assert_eq!(command, Some(Command::SetIncoming { id: 1, value: 9 }));
    }

    #[test]
    fn test_short_payload_dropped() {
        let mut parser = CommandParser::new();
        assert_eq!(parser.feed_bytes(&[0xFF, 0x00, 0x00, 0x01, 0x05]).0, None);
        assert_eq!(parser.feed_bytes(&[0xFF, 0x00, 0x00, 0x00]).0, None);
        assert!(parser.is_idle());
    }
}

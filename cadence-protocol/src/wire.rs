//! Wire-level constants and kind tags
//!
//! Device to host batch:
//! - SYNC (1 byte): 0xFF
//! - COMMAND (1 byte): 0x00 (init)
//! - COUNT (1 byte): number of entries that follow
//! - COUNT x entry: MESSAGE KIND, VALUE KIND, ID, LENGTH, LENGTH payload bytes
//!
//! Host to device command:
//! - SYNC (1 byte): 0xFF
//! - COMMAND (1 byte): 0x00 (set incoming slot)
//! - ID (1 byte), LENGTH (1 byte), LENGTH payload bytes (first two are a LE i16)

/// Frame synchronization byte, also the host's handshake request
pub const SYNC: u8 = 0xFF;

/// Command byte opening a device batch
pub const CMD_INIT: u8 = 0x00;

/// Command byte of a host "set incoming slot" frame
pub const CMD_SET_INCOMING: u8 = 0x00;

/// Device reply to the handshake request
pub const HANDSHAKE_ACK: u8 = 0x0A;

/// Size of an entry header (kind, value kind, id, length)
pub const ENTRY_HEADER_SIZE: usize = 4;

/// Maximum registered outgoing variables
pub const MAX_VARIABLES: usize = 10;

/// Maximum queued debug messages per send cycle
pub const MAX_DEBUG: usize = 30;

/// Maximum queued events per send cycle
pub const MAX_EVENTS: usize = 30;

/// Number of incoming command slots
pub const INCOMING_SLOTS: usize = 2;

/// Longest message text that still fits a one-byte length with its NUL
pub const MAX_MESSAGE_TEXT: usize = u8::MAX as usize - 1;

/// Capacity of a text variable
pub const TEXT_CAPACITY: usize = 64;

/// What an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageKind {
    /// Live variable, sent every cycle
    Var = 0,
    /// Debug text, sent once
    Debug = 1,
    /// Event text, sent once
    Event = 2,
}

impl MessageKind {
    /// Decode a message kind byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Var),
            1 => Some(Self::Debug),
            2 => Some(Self::Event),
            _ => None,
        }
    }
}

/// How an entry's payload is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ValueKind {
    /// Single unsigned byte
    Byte = 0,
    /// Little-endian i16
    Int = 1,
    /// Text bytes followed by a NUL
    Text = 2,
    /// Little-endian IEEE-754 f32
    Float = 3,
}

impl ValueKind {
    /// Decode a value kind byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Byte),
            1 => Some(Self::Int),
            2 => Some(Self::Text),
            3 => Some(Self::Float),
            _ => None,
        }
    }

    /// Payload length for fixed-size kinds, `None` for text
    pub fn fixed_len(self) -> Option<u8> {
        match self {
            Self::Byte => Some(1),
            Self::Int => Some(2),
            Self::Float => Some(4),
            Self::Text => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_bytes() {
        assert_eq!(MessageKind::Event as u8, 2);
        assert_eq!(ValueKind::Float as u8, 3);
        assert_eq!(MessageKind::from_u8(1), Some(MessageKind::Debug));
        assert_eq!(MessageKind::from_u8(3), None);
        assert_eq!(ValueKind::from_u8(2), Some(ValueKind::Text));
        assert_eq!(ValueKind::from_u8(4), None);
    }

    #[test]
    fn test_message_text_fits_length_byte() {
        assert_eq!(MAX_MESSAGE_TEXT + 1, 255);
    }
}

//! Host side of the protocol
//!
//! Decodes the batches a device sends and encodes the frames a host sends
//! back. Used by host tooling and by the device-side tests to check what
//! went over the wire.

use crate::wire::{MessageKind, ValueKind, CMD_INIT, CMD_SET_INCOMING, SYNC};

/// Errors while decoding a device batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Input ended inside the init frame or an entry
    Incomplete,
    /// Init frame did not start with `0xFF, 0x00`
    BadSync,
    /// Entry carried an unknown message kind
    UnknownMessageKind(u8),
    /// Entry carried an unknown value kind
    UnknownValueKind(u8),
    /// Length byte does not fit the value kind
    PayloadMismatch,
}

/// A decoded entry value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'b> {
    Byte(u8),
    Int(i16),
    /// Text bytes without the terminating NUL
    Text(&'b [u8]),
    Float(f32),
}

/// A decoded entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message<'b> {
    pub kind: MessageKind,
    pub id: u8,
    pub value: Value<'b>,
}

impl Message<'_> {
    /// Wire value kind of the decoded value
    pub fn value_kind(&self) -> ValueKind {
        match self.value {
            Value::Byte(_) => ValueKind::Byte,
            Value::Int(_) => ValueKind::Int,
            Value::Text(_) => ValueKind::Text,
            Value::Float(_) => ValueKind::Float,
        }
    }
}

/// Iterator over the entries of one device batch
///
/// Yields at most the announced number of entries and stops after the
/// first error.
#[derive(Debug, Clone)]
pub struct BatchDecoder<'b> {
    buf: &'b [u8],
    pos: usize,
    count: u8,
    remaining: u8,
}

impl<'b> BatchDecoder<'b> {
    /// Read the init frame at the start of `buf`
    pub fn new(buf: &'b [u8]) -> Result<Self, DecodeError> {
        let &[sync, command, count, ..] = buf else {
            return Err(DecodeError::Incomplete);
        };
        if sync != SYNC || command != CMD_INIT {
            return Err(DecodeError::BadSync);
        }
        Ok(Self {
            buf,
            pos: 3,
            count,
            remaining: count,
        })
    }

    /// Number of entries the device announced in the init frame
    ///
    /// May exceed what the iterator yields when the batch is truncated.
    pub fn announced(&self) -> u8 {
        self.count
    }

    /// Bytes of `buf` consumed so far
    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'b [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::Incomplete)?;
        let bytes = self.buf.get(self.pos..end).ok_or(DecodeError::Incomplete)?;
        self.pos = end;
        Ok(bytes)
    }

    fn decode_entry(&mut self) -> Result<Message<'b>, DecodeError> {
        let header = self.take(4)?;
        let (kind, value_kind, id, len) = (header[0], header[1], header[2], header[3]);
        let kind = MessageKind::from_u8(kind).ok_or(DecodeError::UnknownMessageKind(kind))?;
        let value_kind =
            ValueKind::from_u8(value_kind).ok_or(DecodeError::UnknownValueKind(value_kind))?;

        if let Some(expected) = value_kind.fixed_len() {
            if len != expected {
                return Err(DecodeError::PayloadMismatch);
            }
        } else if len == 0 {
            // Text always carries at least its NUL
            return Err(DecodeError::PayloadMismatch);
        }

        let payload = self.take(usize::from(len))?;
        let value = match value_kind {
            ValueKind::Byte => Value::Byte(payload[0]),
            ValueKind::Int => Value::Int(i16::from_le_bytes([payload[0], payload[1]])),
            ValueKind::Float => Value::Float(f32::from_le_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ])),
            ValueKind::Text => Value::Text(&payload[..payload.len() - 1]),
        };
        Ok(Message { kind, id, value })
    }
}

impl<'b> Iterator for BatchDecoder<'b> {
    type Item = Result<Message<'b>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.decode_entry();
        self.remaining = if result.is_ok() { self.remaining - 1 } else { 0 };
        Some(result)
    }
}

/// Frame asking the device to store `value` in incoming slot `id`
pub fn encode_command(id: u8, value: i16) -> [u8; 6] {
    let [lo, hi] = value.to_le_bytes();
    [SYNC, CMD_SET_INCOMING, id, 2, lo, hi]
}

/// Handshake request
pub const fn encode_handshake() -> [u8; 1] {
    [SYNC]
}

//! Bounded catalog of outgoing values and incoming command slots
//!
//! The register never owns the values it publishes. Variables are borrowed
//! cells the application keeps writing to; the register reads them once per
//! send cycle. Debug and event texts are borrowed string slices queued for
//! a single cycle.
//!
//! Every method takes `&self` so tasks holding a shared reference can
//! queue messages while the output task owns the send cycle.

use core::cell::{Cell, RefCell};

use heapless::{String, Vec};

use crate::wire::{
    MessageKind, ValueKind, INCOMING_SLOTS, MAX_DEBUG, MAX_EVENTS, MAX_MESSAGE_TEXT,
    MAX_VARIABLES, TEXT_CAPACITY,
};

/// Mutable text published as a variable
pub type Text = String<TEXT_CAPACITY>;

/// A published variable, observed through a caller-owned cell
#[derive(Debug, Clone, Copy)]
pub enum Variable<'a> {
    Byte(&'a Cell<u8>),
    Int(&'a Cell<i16>),
    Text(&'a RefCell<Text>),
    Float(&'a Cell<f32>),
}

impl Variable<'_> {
    /// Wire value kind of this variable
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Byte(_) => ValueKind::Byte,
            Self::Int(_) => ValueKind::Int,
            Self::Text(_) => ValueKind::Text,
            Self::Float(_) => ValueKind::Float,
        }
    }

    /// Copy the current value into its wire form
    ///
    /// Text is captured at its current length; the NUL is not part of the
    /// snapshot (see [`Entry::nul`]). A text cell that is mutably borrowed
    /// elsewhere is sent empty.
    fn snapshot(&self) -> Snapshot {
        let mut out = Snapshot::new();
        // Capacity covers every kind, so the pushes below cannot fail
        let _ = match self {
            Self::Byte(cell) => out.push(cell.get()).map_err(|_| ()),
            Self::Int(cell) => out.extend_from_slice(&cell.get().to_le_bytes()),
            Self::Float(cell) => out.extend_from_slice(&cell.get().to_le_bytes()),
            Self::Text(cell) => match cell.try_borrow() {
                Ok(text) => out.extend_from_slice(text.as_bytes()),
                Err(_) => Ok(()),
            },
        };
        out
    }
}

type Snapshot = Vec<u8, TEXT_CAPACITY>;

/// One outgoing entry as it goes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'r> {
    pub kind: MessageKind,
    pub value_kind: ValueKind,
    pub id: u8,
    /// Payload bytes, without the text terminator
    pub data: &'r [u8],
    /// Whether a NUL follows `data` on the wire
    pub nul: bool,
}

impl Entry<'_> {
    /// Value of the length byte
    pub fn wire_len(&self) -> u8 {
        // data is bounded by TEXT_CAPACITY or MAX_MESSAGE_TEXT
        (self.data.len() + usize::from(self.nul)) as u8
    }

    fn message(kind: MessageKind, text: &str) -> Entry<'_> {
        let bytes = text.as_bytes();
        Entry {
            kind,
            value_kind: ValueKind::Text,
            id: 0,
            data: &bytes[..bytes.len().min(MAX_MESSAGE_TEXT)],
            nul: true,
        }
    }
}

/// Outgoing variables, queued messages and incoming slots
#[derive(Debug)]
pub struct Register<'a> {
    variables: RefCell<Vec<Variable<'a>, MAX_VARIABLES>>,
    debug: RefCell<Vec<&'a str, MAX_DEBUG>>,
    events: RefCell<Vec<&'a str, MAX_EVENTS>>,
    incoming: [Cell<i16>; INCOMING_SLOTS],
}

impl Default for Register<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Register<'a> {
    /// Empty register, incoming slots at zero
    pub const fn new() -> Self {
        Self {
            variables: RefCell::new(Vec::new()),
            debug: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            incoming: [Cell::new(0), Cell::new(0)],
        }
    }

    /// Publish a variable
    ///
    /// Returns its id (the registration index), or `None` when the register
    /// is full and the variable was dropped.
    pub fn add_variable(&self, variable: Variable<'a>) -> Option<u8> {
        let mut variables = self.variables.borrow_mut();
        let id = variables.len() as u8;
        variables.push(variable).ok().map(|()| id)
    }

    /// Publish a byte cell; its id, or `None` when full
    pub fn add_byte(&self, cell: &'a Cell<u8>) -> Option<u8> {
        self.add_variable(Variable::Byte(cell))
    }

    /// Publish a 16-bit integer cell; its id, or `None` when full
    pub fn add_int(&self, cell: &'a Cell<i16>) -> Option<u8> {
        self.add_variable(Variable::Int(cell))
    }

    /// Publish a float cell; its id, or `None` when full
    pub fn add_float(&self, cell: &'a Cell<f32>) -> Option<u8> {
        self.add_variable(Variable::Float(cell))
    }

    /// Publish a text cell; its id, or `None` when full
    pub fn add_text(&self, cell: &'a RefCell<Text>) -> Option<u8> {
        self.add_variable(Variable::Text(cell))
    }

    /// Queue a debug message for the next send; duplicates and overflow are dropped
    pub fn add_debug(&self, message: &'a str) {
        queue_unique(&mut self.debug.borrow_mut(), message);
    }

    /// Queue an event for the next send; duplicates and overflow are dropped
    pub fn add_event(&self, message: &'a str) {
        queue_unique(&mut self.events.borrow_mut(), message);
    }

    /// Registered variables
    pub fn variable_count(&self) -> usize {
        self.variables.borrow().len()
    }

    /// Pending debug lines
    pub fn debug_count(&self) -> usize {
        self.debug.borrow().len()
    }

    /// Pending events
    pub fn event_count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Total entries in the next batch
    pub fn entry_count(&self) -> u8 {
        // At most 70 with the fixed capacities
        (self.variable_count() + self.debug_count() + self.event_count()) as u8
    }

    /// Drop every queued debug message and event
    pub fn clear_messages(&self) {
        self.debug.borrow_mut().clear();
        self.events.borrow_mut().clear();
    }

    /// Latest value written to an incoming slot, `None` for an invalid id
    pub fn incoming(&self, id: u8) -> Option<i16> {
        self.incoming.get(usize::from(id)).map(Cell::get)
    }

    /// Store a received value; returns false (and drops it) for an invalid id
    pub fn set_incoming(&self, id: u8, value: i16) -> bool {
        match self.incoming.get(usize::from(id)) {
            Some(slot) => {
                slot.set(value);
                true
            }
            None => false,
        }
    }

    /// Visit every entry of the next batch in wire order
    ///
    /// Variables in registration order, then debug messages, then events.
    /// Stops at the first error returned by `f`.
    pub fn for_each_entry<E>(
        &self,
        mut f: impl FnMut(&Entry<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        for (id, variable) in self.variables.borrow().iter().enumerate() {
            let snapshot = variable.snapshot();
            let value_kind = variable.value_kind();
            f(&Entry {
                kind: MessageKind::Var,
                value_kind,
                id: id as u8,
                data: &snapshot,
                nul: value_kind == ValueKind::Text,
            })?;
        }
        for message in self.debug.borrow().iter() {
            f(&Entry::message(MessageKind::Debug, message))?;
        }
        for message in self.events.borrow().iter() {
            f(&Entry::message(MessageKind::Event, message))?;
        }
        Ok(())
    }
}

fn queue_unique<'a, const N: usize>(queue: &mut Vec<&'a str, N>, message: &'a str) {
    if queue.iter().any(|queued| *queued == message) {
        return;
    }
    let _ = queue.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(register: &Register<'_>) -> Vec<(MessageKind, ValueKind, u8, u8), 80> {
        let mut out = Vec::new();
        register
            .for_each_entry(|e| {
                out.push((e.kind, e.value_kind, e.id, e.wire_len()))
                    .map_err(|_| ())
            })
            .unwrap();
        out
    }

    #[test]
    fn test_variable_ids_follow_registration() {
        let a = Cell::new(1u8);
        let b = Cell::new(-2i16);
        let c = Cell::new(0.5f32);
        let register = Register::new();

        assert_eq!(register.add_byte(&a), Some(0));
        assert_eq!(register.add_int(&b), Some(1));
        assert_eq!(register.add_float(&c), Some(2));

        let entries = collect(&register);
        assert_eq!(
            entries.as_slice(),
            &[
                (MessageKind::Var, ValueKind::Byte, 0, 1),
                (MessageKind::Var, ValueKind::Int, 1, 2),
                (MessageKind::Var, ValueKind::Float, 2, 4),
            ]
        );
    }

    #[test]
    fn test_variable_overflow_dropped() {
        let cell = Cell::new(0u8);
        let register = Register::new();
        for i in 0..MAX_VARIABLES {
            assert_eq!(register.add_byte(&cell), Some(i as u8));
        }
        assert_eq!(register.add_byte(&cell), None);
        assert_eq!(register.variable_count(), MAX_VARIABLES);
    }

    #[test]
    fn test_variables_observed_at_send_time() {
        let value = Cell::new(0i16);
        let register = Register::new();
        register.add_int(&value);
        value.set(0x1234);

        let mut payload = [0u8; 2];
        register
            .for_each_entry(|e| {
                payload.copy_from_slice(e.data);
                Ok::<(), ()>(())
            })
            .unwrap();
        assert_eq!(payload, [0x34, 0x12]);
    }

    #[test]
    fn test_text_length_tracks_content() {
        let text = RefCell::new(Text::new());
        let register = Register::new();
        register.add_text(&text);

        assert_eq!(collect(&register)[0].3, 1);
        text.borrow_mut().push_str("open").unwrap();
        assert_eq!(collect(&register)[0].3, 5);
    }

    #[test]
    fn test_debug_dedup_and_clear() {
        let register = Register::new();
        register.add_debug("motor stalled");
        register.add_debug("motor stalled");
        register.add_event("door open");
        assert_eq!(register.debug_count(), 1);
        assert_eq!(register.entry_count(), 2);

        register.clear_messages();
        assert_eq!(register.entry_count(), 0);

        register.add_debug("motor stalled");
        assert_eq!(register.debug_count(), 1);
    }

    #[test]
    fn test_message_queue_capacity() {
        const TEXTS: [&str; 31] = [
            "m0", "m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9", "m10", "m11", "m12",
            "m13", "m14", "m15", "m16", "m17", "m18", "m19", "m20", "m21", "m22", "m23", "m24",
            "m25", "m26", "m27", "m28", "m29", "m30",
        ];
        let register = Register::new();
        for text in TEXTS {
            register.add_event(text);
        }
        assert_eq!(register.event_count(), MAX_EVENTS);
    }

    #[test]
    fn test_messages_follow_variables() {
        let value = Cell::new(7u8);
        let register = Register::new();
        register.add_event("alarm");
        register.add_debug("boot");
        register.add_byte(&value);

        let entries = collect(&register);
        assert_eq!(
            entries.as_slice(),
            &[
                (MessageKind::Var, ValueKind::Byte, 0, 1),
                (MessageKind::Debug, ValueKind::Text, 0, 5),
                (MessageKind::Event, ValueKind::Text, 0, 6),
            ]
        );
    }

    #[test]
    fn test_long_message_truncated() {
        let bytes = [b'x'; 300];
        let long = core::str::from_utf8(&bytes).unwrap();
        let register = Register::new();
        register.add_debug(long);
        assert_eq!(collect(&register)[0].3, 255);
    }

    #[test]
    fn test_incoming_slots() {
        let register = Register::new();
        assert!(register.set_incoming(1, -5));
        assert_eq!(register.incoming(1), Some(-5));
        assert!(!register.set_incoming(2, 9));
        assert_eq!(register.incoming(2), None);
        assert_eq!(register.incoming(0), Some(0));
    }
}

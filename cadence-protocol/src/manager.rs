//! Single facade over the register and the link

use core::cell::{Cell, RefCell};

use cadence_hal::ByteStream;

use crate::link::Link;
use crate::register::{Register, Text, Variable};

/// Register plus link plus connection state
///
/// Shared by reference between the serial tasks and whichever tasks
/// publish values. Until the host's handshake arrives, both
/// [`send_data`](Self::send_data) and [`get_data`](Self::get_data) only
/// attempt the handshake.
pub struct SerialManager<'a, S> {
    register: Register<'a>,
    link: RefCell<Link<S>>,
}

impl<'a, S: ByteStream> SerialManager<'a, S> {
    /// Disconnected manager with an empty register over `stream`
    pub fn new(stream: S) -> Self {
        Self {
            register: Register::new(),
            link: RefCell::new(Link::new(stream)),
        }
    }

    /// Underlying register
    pub fn register(&self) -> &Register<'a> {
        &self.register
    }

    /// Handshake completed and the transport is open
    pub fn is_connected(&self) -> bool {
        self.link.borrow().is_connected()
    }

    /// Publish `variable`; its id, or `None` when full
    pub fn add_variable(&self, variable: Variable<'a>) -> Option<u8> {
        self.register.add_variable(variable)
    }

    /// Publish a byte cell
    pub fn add_byte(&self, cell: &'a Cell<u8>) -> Option<u8> {
        self.register.add_byte(cell)
    }

    /// Publish a 16-bit integer cell
    pub fn add_int(&self, cell: &'a Cell<i16>) -> Option<u8> {
        self.register.add_int(cell)
    }

    /// Publish a float cell
    pub fn add_float(&self, cell: &'a Cell<f32>) -> Option<u8> {
        self.register.add_float(cell)
    }

    /// Publish a text cell
    pub fn add_text(&self, cell: &'a RefCell<Text>) -> Option<u8> {
        self.register.add_text(cell)
    }

    /// Queue a debug line for the next send
    pub fn add_debug(&self, message: &'a str) {
        self.register.add_debug(message)
    }

    /// Queue an event for the next send
    pub fn add_event(&self, message: &'a str) {
        self.register.add_event(message)
    }

    /// Last value the host wrote to incoming slot `id`
    pub fn incoming(&self, id: u8) -> Option<i16> {
        self.register.incoming(id)
    }

    /// Send one batch, or attempt the handshake while disconnected
    ///
    /// Debug and event queues are cleared only after the whole batch was
    /// written; on error they stay queued for the next cycle.
    pub fn send_data(&self) -> Result<(), S::Error> {
        let mut link = self.link.borrow_mut();
        if !link.is_connected() {
            link.try_handshake()?;
            return Ok(());
        }
        link.send_batch(&self.register)?;
        self.register.clear_messages();
        Ok(())
    }

    /// Apply pending host commands, or attempt the handshake while disconnected
    pub fn get_data(&self) -> Result<(), S::Error> {
        let mut link = self.link.borrow_mut();
        if !link.is_connected() {
            link.try_handshake()?;
            return Ok(());
        }
        link.poll_commands(&self.register)?;
        Ok(())
    }

    /// Give the stream back, e.g. to reconfigure the UART
    pub fn into_stream(self) -> S {
        self.link.into_inner().into_stream()
    }
}

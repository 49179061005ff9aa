//! Ready-made tasks

pub mod serial;

pub use serial::{SerialInputTask, SerialOutputTask};

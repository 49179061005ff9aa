//! Application tasks run by the scheduler
//!
//! The serial link tasks come from `cadence-core`; these two are the
//! board-facing side: one samples the inputs into the published values,
//! the other drives the outputs from them and from host commands.

pub mod indicators;
pub mod sensors;

pub use indicators::IndicatorTask;
pub use sensors::{SensorTask, SensorValues};

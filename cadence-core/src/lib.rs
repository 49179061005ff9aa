//! Board-agnostic core of Cadence controllers
//!
//! This crate contains everything a controller needs above the raw
//! capability traits of `cadence-hal`:
//!
//! - Timing primitives ([`timer::Timer`], [`timer::PeriodicTicker`])
//! - Debounced / filtered inputs and buffered outputs ([`io`])
//! - The [`task::Task`] contract and the cooperative [`scheduler::Scheduler`]
//! - Tasks driving the host link ([`tasks`])
//! - Runtime configuration ([`config`])
//!
//! Capabilities are passed in by reference at construction; nothing here
//! reaches for a global.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod io;
pub mod scheduler;
pub mod task;
pub mod tasks;
pub mod timer;

pub use io::{AnalogInput, AnalogOutput, DigitalInput, DigitalOutput};
pub use scheduler::{Scheduler, SchedulerStats, MAX_TASKS};
pub use task::{Task, TaskTiming};
pub use timer::{PeriodicTicker, Timer};

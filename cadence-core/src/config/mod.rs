//! Runtime configuration
//!
//! Controller timing and pin assignment, read from a small TOML file that
//! the firmware embeds at build time.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;

//! Embedded controller configuration
//!
//! `controller.toml` is compiled into the image and checked by `build.rs`,
//! so the fallback below only triggers if the two parsers disagree.

use cadence_core::config::{parse_config, RuntimeConfig};
use defmt::*;

/// Edit controller.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../controller.toml");

/// Parse the embedded configuration, falling back to defaults
///
/// A timing mismatch is reported but not corrected; the scheduler runs
/// the periods as given.
pub fn load() -> RuntimeConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            warn!("Embedded configuration rejected: {}", e);
            warn!("Using default configuration");
            RuntimeConfig::default()
        }
    };

    if let Err(e) = config.validate() {
        warn!("Task timing does not fit the base period: {}", e);
    }
    config
}

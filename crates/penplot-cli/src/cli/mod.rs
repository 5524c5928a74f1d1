//! CLI command implementations.
//!
//! - `export` - SVG to G-code, optionally with a calibration file
//! - `calibrate` - calibration file only
//! - `stats` - per-pen geometry counts after distribution

pub mod calibrate;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod stats;

pub use calibrate::cmd_calibrate;
pub use error::CliError;
pub use export::cmd_export;
pub use stats::cmd_stats;

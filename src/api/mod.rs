//! Host-facing output helpers

pub mod formatting;

pub use formatting::{OutputFormat, SpeedFormatter};

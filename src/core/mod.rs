//! Core types and constants for the speed pipeline

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;

//! Geodesic algorithms

pub mod geodesic;

pub use geodesic::{destination, distance, speed_from_distance};

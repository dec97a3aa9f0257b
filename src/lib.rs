//! GPS Speed Estimation
//!
//! Turns a stream of noisy geographic fixes into a stable speed estimate:
//! fixes are averaged in batches, consecutive batch averages are compared
//! with the haversine distance, and the resulting speed is noise-gated and
//! smoothed with a moving average.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod feed;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Position, Fix, Speed, Distance, EARTH_RADIUS_KM};
pub use crate::algorithms::geodesic::distance;
pub use processing::{SpeedPipeline, BatchReport, SampleAccumulator, NoiseGate, MovingAverage};
pub use utils::config::{PipelineConfig, IntervalSource, ConfigError};
pub use feed::{PositionFeed, ReplayFeed, SimulatedFeed, FeedError, FeedResult};
pub use api::{OutputFormat, SpeedFormatter};

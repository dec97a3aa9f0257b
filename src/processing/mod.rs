//! Streaming stages of the speed pipeline

pub mod aggregator;
pub mod noise_gate;
pub mod smoother;
pub mod pipeline;

pub use aggregator::{AveragedFix, SampleAccumulator};
pub use noise_gate::NoiseGate;
pub use smoother::MovingAverage;
pub use pipeline::{BatchReport, SpeedPipeline};

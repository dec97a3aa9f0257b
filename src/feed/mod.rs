//! Position feeds driving the pipeline
//!
//! A feed stands in for the platform location provider: it produces one
//! [`Fix`] per call and is responsible for dropping unavailable or invalid
//! fixes before they reach the pipeline.

pub mod error;
pub mod replay;
pub mod simulated;

pub use error::{FeedError, FeedResult};
pub use replay::ReplayFeed;
pub use simulated::SimulatedFeed;

use crate::core::Fix;

/// Source of raw position fixes
pub trait PositionFeed {
    /// Next fix, or `Ok(None)` once the feed is exhausted
    fn next_fix(&mut self) -> FeedResult<Option<Fix>>;
}

impl<F: PositionFeed + ?Sized> PositionFeed for Box<F> {
    fn next_fix(&mut self) -> FeedResult<Option<Fix>> {
        (**self).next_fix()
    }
}

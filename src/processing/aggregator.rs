use nalgebra::Vector2;
use crate::core::{Fix, Position};

/// Averaged output of one completed batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedFix {
    pub position: Position,
    /// Mean acquisition time of the batch, only when every sample was timed
    pub timestamp_ms: Option<f64>,
}

/// Running sums for the batch currently being collected
///
/// `count` stays in `[0, batch_size)` between calls; reaching `batch_size`
/// flushes the batch and zeroes everything.
#[derive(Debug, Clone)]
pub struct SampleAccumulator {
    batch_size: usize,
    /// Running sum of [lat, lon]
    sum: Vector2<f64>,
    count: usize,
    timestamp_sum_ms: f64,
    timed_count: usize,
}

impl SampleAccumulator {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            sum: Vector2::zeros(),
            count: 0,
            timestamp_sum_ms: 0.0,
            timed_count: 0,
        }
    }

    /// Add one sample; returns the batch average once `batch_size` samples
    /// have been collected
    pub fn push(&mut self, fix: &Fix) -> Option<AveragedFix> {
        self.sum += Vector2::new(fix.position.lat, fix.position.lon);
        self.count += 1;
        if let Some(ts) = fix.timestamp_ms {
            self.timestamp_sum_ms += ts as f64;
            self.timed_count += 1;
        }

        if self.count < self.batch_size {
            return None;
        }

        let n = self.batch_size as f64;
        let mean = self.sum / n;
        let timestamp_ms = if self.timed_count == self.batch_size {
            Some(self.timestamp_sum_ms / n)
        } else {
            None
        };

        self.clear();

        Some(AveragedFix {
            position: Position::new(mean.x, mean.y),
            timestamp_ms,
        })
    }

    /// Samples collected towards the current batch
    pub fn pending(&self) -> usize {
        self.count
    }

    pub fn clear(&mut self) {
        self.sum = Vector2::zeros();
        self.count = 0;
        self.timestamp_sum_ms = 0.0;
        self.timed_count = 0;
    }
}

//! Simulated track for testing and development

use crate::algorithms::geodesic;
use crate::core::{Fix, Position, DEFAULT_SAMPLE_INTERVAL_MS};
use crate::feed::{FeedResult, PositionFeed};

/// Repeating north/east offsets (metres) applied on top of the true track
const JITTER_PATTERN_M: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.8, -0.5),
    (-0.6, 0.9),
    (0.3, 0.4),
    (-0.9, -0.2),
    (0.4, -0.6),
];

/// Deterministic constant-velocity track
#[derive(Debug, Clone)]
pub struct SimulatedFeed {
    start: Position,
    bearing_deg: f64,
    speed_kmh: f64,
    interval_ms: u64,
    samples: usize,
    jitter_scale: f64,
    emitted: usize,
}

impl SimulatedFeed {
    /// Track leaving `start` on `bearing_deg` at `speed_kmh`, one fix per
    /// default sample interval
    pub fn new(start: Position, bearing_deg: f64, speed_kmh: f64, samples: usize) -> Self {
        Self {
            start,
            bearing_deg,
            speed_kmh,
            interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            samples,
            jitter_scale: 0.0,
            emitted: 0,
        }
    }

    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Scale the built-in jitter pattern; 1.0 keeps offsets under a metre
    pub fn with_jitter(mut self, scale: f64) -> Self {
        self.jitter_scale = scale;
        self
    }

    /// True (noise-free) position of sample `index`
    pub fn true_position(&self, index: usize) -> Position {
        let elapsed_h = (index as u64 * self.interval_ms) as f64 / crate::core::MS_PER_HOUR;
        geodesic::destination(&self.start, self.bearing_deg, self.speed_kmh * elapsed_h)
    }

    pub fn remaining(&self) -> usize {
        self.samples - self.emitted
    }
}

impl PositionFeed for SimulatedFeed {
    fn next_fix(&mut self) -> FeedResult<Option<Fix>> {
        if self.emitted >= self.samples {
            return Ok(None);
        }

        let index = self.emitted;
        self.emitted += 1;

        let mut position = self.true_position(index);
        if self.jitter_scale != 0.0 {
            let (north_m, east_m) = JITTER_PATTERN_M[index % JITTER_PATTERN_M.len()];
            position = geodesic::destination(&position, 0.0, north_m * self.jitter_scale / 1000.0);
            position = geodesic::destination(&position, 90.0, east_m * self.jitter_scale / 1000.0);
        }

        Ok(Some(Fix::new(position).with_timestamp(index as u64 * self.interval_ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_emits_requested_samples() {
        let mut feed = SimulatedFeed::new(Position::new(-34.6037, -58.3816), 45.0, 20.0, 4);
        let mut timestamps = Vec::new();
        while let Some(fix) = feed.next_fix().unwrap() {
            timestamps.push(fix.timestamp_ms.unwrap());
        }
        assert_eq!(timestamps, vec![0, 1000, 2000, 3000]);
        assert_eq!(feed.remaining(), 0);
        assert_eq!(feed.next_fix().unwrap(), None);
    }

    #[test]
    fn test_spacing_matches_speed() {
        // 36 km/h is 10 m per second
        let mut feed = SimulatedFeed::new(Position::new(10.0, 20.0), 90.0, 36.0, 2);
        let a = feed.next_fix().unwrap().unwrap();
        let b = feed.next_fix().unwrap().unwrap();
        assert_abs_diff_eq!(geodesic::distance(&a.position, &b.position), 0.010, epsilon = 1e-9);
    }

    #[test]
    fn test_jitter_stays_near_track() {
        let mut feed = SimulatedFeed::new(Position::new(10.0, 20.0), 0.0, 18.0, 12).with_jitter(1.0);
        let truth = feed.clone();
        let mut index = 0;
        while let Some(fix) = feed.next_fix().unwrap() {
            let offset_km = geodesic::distance(&fix.position, &truth.true_position(index));
            assert!(offset_km < 0.0015, "sample {} off by {} km", index, offset_km);
            index += 1;
        }
        assert_eq!(index, 12);
    }
}

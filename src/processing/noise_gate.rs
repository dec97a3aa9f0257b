use crate::core::{Speed, DEFAULT_NOISE_FLOOR_KMH};

/// Treats speeds at or below the floor as stationary jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseGate {
    pub floor_kmh: Speed,
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self {
            floor_kmh: DEFAULT_NOISE_FLOOR_KMH,
        }
    }
}

impl NoiseGate {
    pub fn new(floor_kmh: Speed) -> Self {
        Self { floor_kmh }
    }

    pub fn gate(&self, speed: Speed) -> Speed {
        if speed <= self.floor_kmh {
            0.0
        } else {
            speed
        }
    }
}

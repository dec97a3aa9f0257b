//! Core data types for the speed pipeline

use serde::{Deserialize, Serialize};

/// Speed in kilometres per hour
pub type Speed = f64;

/// Great-circle distance in kilometres
pub type Distance = f64;

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both coordinates are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.has_valid_lat() && self.has_valid_lon()
    }

    pub fn has_valid_lat(&self) -> bool {
        self.lat.is_finite() && self.lat.abs() <= 90.0
    }

    pub fn has_valid_lon(&self) -> bool {
        self.lon.is_finite() && self.lon.abs() <= 180.0
    }
}

/// A raw position sample as delivered by a feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    #[serde(flatten)]
    pub position: Position,
    /// Acquisition time in milliseconds, when the feed knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
}

impl Fix {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            timestamp_ms: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}

impl From<Position> for Fix {
    fn from(position: Position) -> Self {
        Fix::new(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_validity() {
        assert!(Position::new(-34.6037, -58.3816).is_valid());
        assert!(Position::new(90.0, 180.0).is_valid());
        assert!(!Position::new(90.5, 0.0).is_valid());
        assert!(!Position::new(0.0, f64::NAN).is_valid());
        assert!(Position::new(0.0, f64::NAN).has_valid_lat());
        assert!(!Position::new(-91.0, 0.0).has_valid_lat());
        assert!(!Position::new(0.0, 180.5).has_valid_lon());
    }

    #[test]
    fn test_fix_json_layout() {
        let fix: Fix = serde_json::from_str(r#"{"lat": 1.5, "lon": -2.0, "timestamp_ms": 42}"#).unwrap();
        assert_eq!(fix.position, Position::new(1.5, -2.0));
        assert_eq!(fix.timestamp_ms, Some(42));

        let untimed: Fix = serde_json::from_str(r#"{"lat": 1.5, "lon": -2.0}"#).unwrap();
        assert_eq!(untimed.timestamp_ms, None);
    }
}

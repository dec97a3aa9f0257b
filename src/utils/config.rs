use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::{
    DEFAULT_BATCH_SIZE, DEFAULT_NOISE_FLOOR_KMH, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_WINDOW_SIZE,
};

/// Which time base converts batch-to-batch distance into speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalSource {
    /// Always divide by the configured sample interval
    #[default]
    Nominal,
    /// Divide by the elapsed time between batch mean timestamps, falling
    /// back to the nominal interval when timestamps are unusable
    Measured,
}

/// Pipeline parameters, fixed once a pipeline is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw samples averaged into one reported position
    pub batch_size: usize,
    /// Moving-average window length (batches)
    pub window_size: usize,
    /// Speeds at or below this are reported as zero (km/h)
    pub noise_floor_kmh: f64,
    /// Nominal feed cadence (milliseconds)
    pub sample_interval_ms: u64,
    pub interval_source: IntervalSource,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    #[error("{message}")]
    IoError { message: String },
    #[error("{message}")]
    SerializationError { message: String },
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
            noise_floor_kmh: DEFAULT_NOISE_FLOOR_KMH,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            interval_source: IntervalSource::Nominal,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_noise_floor(mut self, noise_floor_kmh: f64) -> Self {
        self.noise_floor_kmh = noise_floor_kmh;
        self
    }

    pub fn with_sample_interval(mut self, sample_interval_ms: u64) -> Self {
        self.sample_interval_ms = sample_interval_ms;
        self
    }

    pub fn with_interval_source(mut self, interval_source: IntervalSource) -> Self {
        self.interval_source = interval_source;
        self
    }

    /// Check every parameter, reporting the first one out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", self.batch_size, "Batch size must be at least 1"));
        }

        if self.window_size == 0 {
            return Err(invalid("window_size", self.window_size, "Smoothing window must hold at least 1 value"));
        }

        if !self.noise_floor_kmh.is_finite() || self.noise_floor_kmh < 0.0 {
            return Err(invalid(
                "noise_floor_kmh",
                self.noise_floor_kmh,
                "Noise floor must be a finite, non-negative speed",
            ));
        }

        if self.sample_interval_ms == 0 {
            return Err(invalid(
                "sample_interval_ms",
                self.sample_interval_ms,
                "Sample interval must be greater than 0 ms",
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path)
            .map_err(|e| ConfigError::IoError {
                message: format!("Failed to read config file '{}': {}", path_str, e),
            })?;

        Self::from_json_str(&content).map_err(|e| match e {
            ConfigError::SerializationError { message } => ConfigError::SerializationError {
                message: format!("{} ({})", message, path_str),
            },
            other => other,
        })
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content)
            .map_err(|e| ConfigError::IoError {
                message: format!("Failed to write config file '{}': {}", path_str, e),
            })
    }
}

fn invalid<T: ToString>(parameter: &str, value: T, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.window_size, 5);
        assert_eq!(config.noise_floor_kmh, 4.0);
        assert_eq!(config.sample_interval_ms, 1000);
        assert_eq!(config.interval_source, IntervalSource::Nominal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        let zero_batch = PipelineConfig::new().with_batch_size(0);
        assert!(matches!(
            zero_batch.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "batch_size"
        ));

        let zero_window = PipelineConfig::new().with_window_size(0);
        assert!(matches!(
            zero_window.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "window_size"
        ));

        for floor in [-1.0, f64::NAN, f64::INFINITY] {
            let config = PipelineConfig::new().with_noise_floor(floor);
            assert!(config.validate().is_err(), "floor {} accepted", floor);
        }

        let zero_interval = PipelineConfig::new().with_sample_interval(0);
        assert!(zero_interval.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"window_size": 8, "interval_source": "measured"}"#).unwrap();
        assert_eq!(config.window_size, 8);
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.interval_source, IntervalSource::Measured);
    }

    #[test]
    fn test_json_rejects_invalid_values() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"batch_size": 0}"#),
            Err(ConfigError::InvalidParameter { .. })
        ));
        assert!(matches!(
            PipelineConfig::from_json_str("not json"),
            Err(ConfigError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = std::env::temp_dir().join(format!("geo_speed_config_{}.json", std::process::id()));
        let config = PipelineConfig::new()
            .with_batch_size(4)
            .with_noise_floor(2.5)
            .with_interval_source(IntervalSource::Measured);

        config.save_to_file(&path).unwrap();
        let loaded = PipelineConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let result = PipelineConfig::from_file("/nonexistent/geo_speed.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_error_display() {
        let err = PipelineConfig::new().with_batch_size(0).validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid batch_size = 0: Batch size must be at least 1");
    }
}

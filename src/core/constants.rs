//! Physical constants and pipeline defaults

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Milliseconds per hour, converts km per ms into km/h
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Raw samples averaged into one reported position
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Batches kept in the moving-average window
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Speeds at or below this value are treated as GPS jitter (km/h)
pub const DEFAULT_NOISE_FLOOR_KMH: f64 = 4.0;

/// Nominal feed cadence (ms)
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

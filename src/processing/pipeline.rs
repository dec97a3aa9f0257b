//! Position-to-speed streaming pipeline
//!
//! Raw fixes are averaged in fixed-size batches. Each completed batch is
//! compared against the previous one with the haversine distance, converted
//! to km/h, gated against the noise floor and smoothed with a trailing
//! moving average.
//!
//! The pipeline is driven by the host calling [`SpeedPipeline::submit`] once
//! per incoming fix. All state is mutated in place through `&mut self`;
//! hosts receiving fixes on several threads must serialise them first.
//!
//! Before the first batch completes the reference position is the `(0, 0)`
//! sentinel, so the first report is a large startup spike that the smoother
//! passes through unchanged while warming up.

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::algorithms::geodesic;
use crate::core::{Distance, Fix, Position, Speed};
use crate::processing::aggregator::{AveragedFix, SampleAccumulator};
use crate::processing::noise_gate::NoiseGate;
use crate::processing::smoother::MovingAverage;
use crate::utils::config::{ConfigError, IntervalSource, PipelineConfig};

/// Intermediate values of one flushed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 1-based index of the batch since start or the last reset
    pub batch_index: u64,
    /// Mean position of the batch, now the reference for the next one
    pub averaged: Position,
    pub distance_km: Distance,
    /// Time base used for the speed conversion
    pub interval_ms: f64,
    pub raw_kmh: Speed,
    pub gated_kmh: Speed,
    pub smoothed_kmh: Speed,
}

#[derive(Debug, Clone)]
pub struct SpeedPipeline {
    config: PipelineConfig,
    accumulator: SampleAccumulator,
    reference: Position,
    reference_time_ms: Option<f64>,
    gate: NoiseGate,
    smoother: MovingAverage,
    batches: u64,
    /// Set once the missing-timestamp fallback has been reported
    untimed_warned: bool,
}

impl SpeedPipeline {
    /// Build a pipeline after validating `config`
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            accumulator: SampleAccumulator::new(config.batch_size),
            reference: Position::default(),
            reference_time_ms: None,
            gate: NoiseGate::new(config.noise_floor_kmh),
            smoother: MovingAverage::new(config.window_size),
            batches: 0,
            untimed_warned: false,
            config,
        })
    }

    /// Feed one position; yields the smoothed speed on every completed batch
    pub fn submit(&mut self, position: Position) -> Option<Speed> {
        self.submit_fix(Fix::new(position))
    }

    /// Like [`submit`](Self::submit) but carries the fix timestamp, used when
    /// the interval source is [`IntervalSource::Measured`]
    pub fn submit_fix(&mut self, fix: Fix) -> Option<Speed> {
        self.submit_detailed(fix).map(|report| report.smoothed_kmh)
    }

    pub fn submit_detailed(&mut self, fix: Fix) -> Option<BatchReport> {
        trace!("sample {:?} ({}/{})", fix.position, self.accumulator.pending() + 1, self.config.batch_size);

        let averaged = self.accumulator.push(&fix)?;
        Some(self.flush(averaged))
    }

    fn flush(&mut self, averaged: AveragedFix) -> BatchReport {
        self.batches += 1;

        let distance_km = geodesic::distance(&averaged.position, &self.reference);
        let interval_ms = self.interval_for(&averaged);
        let raw_kmh = geodesic::speed_from_distance(distance_km, interval_ms);
        let gated_kmh = self.gate.gate(raw_kmh);
        let smoothed_kmh = self.smoother.smooth(gated_kmh);

        if self.batches == 1 {
            info!(
                "first batch measured against the (0, 0) sentinel, reporting {:.1} km/h as startup transient",
                raw_kmh
            );
        }

        debug!(
            "batch {}: avg ({:.7}, {:.7}) moved {:.6} km in {:.0} ms -> raw {:.2} gated {:.2} smoothed {:.2} km/h",
            self.batches,
            averaged.position.lat,
            averaged.position.lon,
            distance_km,
            interval_ms,
            raw_kmh,
            gated_kmh,
            smoothed_kmh
        );

        self.reference = averaged.position;
        self.reference_time_ms = averaged.timestamp_ms;

        BatchReport {
            batch_index: self.batches,
            averaged: averaged.position,
            distance_km,
            interval_ms,
            raw_kmh,
            gated_kmh,
            smoothed_kmh,
        }
    }

    fn interval_for(&mut self, averaged: &AveragedFix) -> f64 {
        let nominal = self.config.sample_interval_ms as f64;
        if self.config.interval_source == IntervalSource::Nominal {
            return nominal;
        }

        match (self.reference_time_ms, averaged.timestamp_ms) {
            (Some(previous), Some(current)) if current > previous => current - previous,
            (Some(previous), Some(current)) => {
                warn!(
                    "non-increasing batch timestamps ({} -> {} ms), using nominal {} ms",
                    previous, current, nominal
                );
                nominal
            }
            _ if self.batches == 1 => nominal,
            _ if !self.untimed_warned => {
                warn!("batch timestamps unavailable, using nominal {} ms", nominal);
                self.untimed_warned = true;
                nominal
            }
            _ => {
                debug!("batch {} untimed, using nominal {} ms", self.batches, nominal);
                nominal
            }
        }
    }

    /// Drop all accumulated state, as if freshly built
    pub fn reset(&mut self) {
        self.accumulator.clear();
        self.reference = Position::default();
        self.reference_time_ms = None;
        self.smoother.reset();
        self.batches = 0;
        self.untimed_warned = false;
    }

    /// Baseline for the next distance computation
    pub fn reference(&self) -> Position {
        self.reference
    }

    pub fn pending_samples(&self) -> usize {
        self.accumulator.pending()
    }

    pub fn batches_processed(&self) -> u64 {
        self.batches
    }

    pub fn smoother(&self) -> &MovingAverage {
        &self.smoother
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

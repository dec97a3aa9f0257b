//! Speed report output formatting
//!
//! Text mirrors a speedometer readout, JSON serialises the full batch report
//! and CSV gives one row per reported batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::processing::pipeline::BatchReport;

/// Output format for reported speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (expected text, json or csv)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Formatter turning batch reports into output lines
#[derive(Debug, Clone)]
pub struct SpeedFormatter {
    pub format: OutputFormat,
    /// Decimal places for speeds in text and CSV output
    pub precision: usize,
}

impl Default for SpeedFormatter {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: 0,
        }
    }
}

impl SpeedFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Header line to emit before any report, if the format has one
    pub fn header(&self) -> Option<String> {
        match self.format {
            OutputFormat::Csv => Some(self.csv_header()),
            _ => None,
        }
    }

    /// Format a report in the configured format
    pub fn format(&self, report: &BatchReport) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Csv => Ok(self.format_csv(report)),
        }
    }

    pub fn format_text(&self, report: &BatchReport) -> String {
        format!(
            "Lat: {}, Long: {} | Speed: {:.*} km/h",
            report.averaged.lat, report.averaged.lon, self.precision, report.smoothed_kmh
        )
    }

    pub fn format_json(&self, report: &BatchReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }

    pub fn csv_header(&self) -> String {
        "batch,latitude,longitude,distance_km,interval_ms,raw_kmh,gated_kmh,smoothed_kmh".to_string()
    }

    pub fn format_csv(&self, report: &BatchReport) -> String {
        let p = self.precision;
        format!(
            "{},{:.7},{:.7},{:.6},{:.0},{:.*},{:.*},{:.*}",
            report.batch_index,
            report.averaged.lat,
            report.averaged.lon,
            report.distance_km,
            report.interval_ms,
            p,
            report.raw_kmh,
            p,
            report.gated_kmh,
            p,
            report.smoothed_kmh
        )
    }
}

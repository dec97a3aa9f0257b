//! Replay of recorded fixes from text
//!
//! One fix per line, in any of these forms:
//!
//! ```text
//! # comment
//! -34.603700,-58.381600
//! 1700000000000,-34.603700,-58.381600
//! {"lat": -34.6037, "lon": -58.3816, "timestamp_ms": 1700000000000}
//! ```
//!
//! Blank lines and `#` comments are ignored.

use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::{Fix, Position};
use crate::feed::{FeedError, FeedResult, PositionFeed};

/// Feed reading fixes line by line from any buffered reader
pub struct ReplayFeed<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
    strict: bool,
    skipped: usize,
}

impl ReplayFeed<BufReader<File>> {
    /// Open a recording on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> FeedResult<Self> {
        let file = File::open(&path).map_err(|e| FeedError::Io {
            message: format!("Failed to open '{}': {}", path.as_ref().display(), e),
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayFeed<R> {
    /// Create a lenient feed: malformed lines are logged and skipped
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            strict: false,
            skipped: 0,
        }
    }

    /// Return malformed lines as errors instead of skipping them
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Lines dropped so far in lenient mode
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> PositionFeed for ReplayFeed<R> {
    fn next_fix(&mut self) -> FeedResult<Option<Fix>> {
        loop {
            self.buffer.clear();
            if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let parsed = match std::str::from_utf8(&self.buffer) {
                Ok(line) => parse_line(line, self.line_number),
                Err(e) => Err(FeedError::InvalidFormat {
                    line: self.line_number,
                    details: format!("not valid UTF-8: {}", e),
                }),
            };

            match parsed {
                Ok(Some(fix)) => return Ok(Some(fix)),
                Ok(None) => continue,
                Err(e) if !self.strict && e.is_recoverable() => {
                    warn!("skipping fix: {}", e);
                    self.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse one recorded line; `Ok(None)` for blanks and comments
pub fn parse_line(line: &str, line_number: usize) -> FeedResult<Option<Fix>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fix = if trimmed.starts_with('{') {
        serde_json::from_str::<Fix>(trimmed).map_err(|e| FeedError::InvalidFormat {
            line: line_number,
            details: e.to_string(),
        })?
    } else {
        parse_delimited(trimmed, line_number)?
    };

    validate_position(&fix.position, line_number)?;
    Ok(Some(fix))
}

fn parse_delimited(line: &str, line_number: usize) -> FeedResult<Fix> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    let number = |field: &str, name: &str| -> FeedResult<f64> {
        field.parse::<f64>().map_err(|_| FeedError::InvalidFormat {
            line: line_number,
            details: format!("{} '{}' is not a number", name, field),
        })
    };

    match fields.as_slice() {
        [lat, lon] => Ok(Fix::new(Position::new(number(*lat, "latitude")?, number(*lon, "longitude")?))),
        [ts, lat, lon] => {
            let timestamp_ms = ts.parse::<u64>().map_err(|_| FeedError::InvalidFormat {
                line: line_number,
                details: format!("timestamp '{}' is not an integer millisecond count", ts),
            })?;
            Ok(Fix::new(Position::new(number(*lat, "latitude")?, number(*lon, "longitude")?))
                .with_timestamp(timestamp_ms))
        }
        _ => Err(FeedError::InvalidFormat {
            line: line_number,
            details: format!("expected 2 or 3 comma-separated fields, found {}", fields.len()),
        }),
    }
}

fn validate_position(position: &Position, line_number: usize) -> FeedResult<()> {
    if position.is_valid() {
        return Ok(());
    }

    let (field, value) = if position.has_valid_lat() {
        ("longitude", position.lon)
    } else {
        ("latitude", position.lat)
    };

    Err(FeedError::InvalidPosition {
        line: line_number,
        field: field.to_string(),
        value,
    })
}

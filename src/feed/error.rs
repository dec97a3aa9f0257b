//! Feed error types and handling

use thiserror::Error;

/// Errors raised while pulling fixes from a feed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// Underlying reader failed
    #[error("Feed I/O error: {message}")]
    Io { message: String },
    /// Line could not be parsed as a fix
    #[error("Line {line}: invalid format: {details}")]
    InvalidFormat { line: usize, details: String },
    /// Parsed coordinate is non-finite or out of range
    #[error("Line {line}: invalid {field} {value}")]
    InvalidPosition { line: usize, field: String, value: f64 },
}

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// Whether the feed can keep going after skipping the offending fix
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FeedError::Io { .. })
    }
}

impl From<std::io::Error> for FeedError {
    fn from(error: std::io::Error) -> Self {
        FeedError::Io {
            message: error.to_string(),
        }
    }
}

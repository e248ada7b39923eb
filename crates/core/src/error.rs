//! Error types for the FX direction pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the FX direction pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Ambiguous candle ordering: duplicate timestamps for one pair.
    /// Fatal to the invocation, never resolved silently.
    #[error("ambiguous candle ordering: duplicate event_time {event_time} for {pair_name}")]
    Ordering {
        pair_name: String,
        event_time: DateTime<Utc>,
    },

    /// A hard precondition on input size was not met.
    ///
    /// Warm-up shortfalls inside the feature engine are reported as
    /// empty output instead, so callers can tell "no signal yet" from
    /// broken input.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Classifier artifact absent at load time.
    #[error("model artifact not found: {0}")]
    MissingArtifact(PathBuf),

    /// Candle violating the OHLC invariants.
    #[error("invalid candle: {0}")]
    InvalidCandle(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Classifier error (unfitted model, dimension mismatch, ...).
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Candle/prediction storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an ordering error for a duplicated timestamp.
    pub fn ordering(pair_name: impl Into<String>, event_time: DateTime<Utc>) -> Self {
        Error::Ordering {
            pair_name: pair_name.into(),
            event_time,
        }
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Error::InsufficientData(msg.into())
    }

    /// Create an invalid candle error.
    pub fn invalid_candle(msg: impl Into<String>) -> Self {
        Error::InvalidCandle(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a classifier error.
    pub fn classifier(msg: impl Into<String>) -> Self {
        Error::Classifier(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }
}

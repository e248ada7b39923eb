//! Core data types for the FX direction pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One fixed-duration OHLCV observation for a currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Instrument identifier (e.g., "USDJPY").
    pub pair_name: String,
    /// Bucket start time (UTC). Unique per pair.
    pub event_time: DateTime<Utc>,
    /// Open price.
    pub open_price: f64,
    /// High price.
    pub high_price: f64,
    /// Low price.
    pub low_price: f64,
    /// Close price.
    pub close_price: f64,
    /// Traded volume; zero when the source omits it.
    #[serde(default)]
    pub volume: u64,
}

impl Candle {
    /// Check the OHLC invariants: non-empty pair, positive prices,
    /// and `low <= {open, close} <= high`.
    pub fn validate(&self) -> Result<()> {
        if self.pair_name.is_empty() {
            return Err(Error::invalid_candle("empty pair_name"));
        }
        if self.low_price <= 0.0 {
            return Err(Error::invalid_candle(format!(
                "non-positive low price {} at {}",
                self.low_price, self.event_time
            )));
        }
        let low_ok = self.low_price <= self.open_price && self.low_price <= self.close_price;
        let high_ok = self.open_price <= self.high_price && self.close_price <= self.high_price;
        if !low_ok || !high_ok {
            return Err(Error::invalid_candle(format!(
                "OHLC bounds violated at {}: o={} h={} l={} c={}",
                self.event_time, self.open_price, self.high_price, self.low_price, self.close_price
            )));
        }
        Ok(())
    }

    /// True range versus the previous close (used by ATR).
    #[inline]
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high_price - self.low_price;
        let hc = (self.high_price - prev_close).abs();
        let lc = (self.low_price - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Predicted short-horizon price direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl Direction {
    /// Map a binary class label (1 = up, 0 = down) to a direction.
    #[inline]
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(Error::storage(format!("unknown direction '{other}'"))),
        }
    }
}

/// One scored outcome for an instrument at a point in time.
///
/// Uniqueness key is `(pair_name, target_time)`; later writes for the
/// same key replace earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Instrument identifier.
    pub pair_name: String,
    /// Timestamp of the candle the prediction was scored on.
    pub target_time: DateTime<Utc>,
    /// Predicted direction.
    pub direction: Direction,
    /// Confidence percentage in `[50, 100]` (max of the two-class
    /// probability pair).
    pub confidence: f64,
}

impl PredictionRecord {
    /// The replace-on-conflict key.
    #[inline]
    pub fn key(&self) -> (&str, DateTime<Utc>) {
        (&self.pair_name, self.target_time)
    }
}

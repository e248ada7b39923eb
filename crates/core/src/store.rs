//! Candle store boundary.
//!
//! Implementations live in the `fx-store` crate; the trait lives here
//! so the adapters can be written (and tested) against the contract
//! alone.

use crate::error::Result;
use crate::types::{Candle, PredictionRecord};

/// Durable storage for candles and prediction records.
///
/// Candles are keyed `(pair_name, event_time)` and predictions
/// `(pair_name, target_time)`; writes are upserts where a later write
/// for the same key replaces the earlier one.
pub trait CandleStore {
    /// Fetch the newest `limit` candles for a pair, ascending by
    /// `event_time`.
    fn fetch_recent(&self, pair_name: &str, limit: usize) -> Result<Vec<Candle>>;

    /// Fetch every stored candle for a pair, ascending by `event_time`.
    fn fetch_all(&self, pair_name: &str) -> Result<Vec<Candle>>;

    /// Upsert candles, validating the OHLC invariants first.
    /// Returns the number of rows written.
    fn upsert_candles(&mut self, candles: &[Candle]) -> Result<usize>;

    /// Upsert prediction records. Returns the number of rows written.
    fn save_predictions(&mut self, records: &[PredictionRecord]) -> Result<usize>;
}

//! In-memory candle store.
//!
//! Backs adapter tests and dry runs; keys and upsert semantics match
//! the SQLite store exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fx_core::{Candle, CandleStore, PredictionRecord, Result};

/// A `CandleStore` held entirely in memory, ordered by `(pair_name,
/// event_time)`.
#[derive(Debug, Default)]
pub struct MemoryCandleStore {
    candles: BTreeMap<(String, DateTime<Utc>), Candle>,
    predictions: BTreeMap<(String, DateTime<Utc>), PredictionRecord>,
}

impl MemoryCandleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored predictions for a pair, ascending by `target_time`.
    pub fn predictions(&self, pair_name: &str) -> Vec<PredictionRecord> {
        self.predictions
            .values()
            .filter(|r| r.pair_name == pair_name)
            .cloned()
            .collect()
    }

    /// Number of stored candles across all pairs.
    pub fn candle_count(&self) -> usize {
        self.candles.len()
    }
}

impl CandleStore for MemoryCandleStore {
    fn fetch_recent(&self, pair_name: &str, limit: usize) -> Result<Vec<Candle>> {
        let all = self.fetch_all(pair_name)?;
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }

    fn fetch_all(&self, pair_name: &str) -> Result<Vec<Candle>> {
        Ok(self
            .candles
            .values()
            .filter(|c| c.pair_name == pair_name)
            .cloned()
            .collect())
    }

    fn upsert_candles(&mut self, candles: &[Candle]) -> Result<usize> {
        for candle in candles {
            candle.validate()?;
        }
        for candle in candles {
            self.candles.insert(
                (candle.pair_name.clone(), candle.event_time),
                candle.clone(),
            );
        }
        Ok(candles.len())
    }

    fn save_predictions(&mut self, records: &[PredictionRecord]) -> Result<usize> {
        for record in records {
            self.predictions.insert(
                (record.pair_name.clone(), record.target_time),
                record.clone(),
            );
        }
        Ok(records.len())
    }
}

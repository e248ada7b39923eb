//! The inference adapter: recent candles in, prediction records out.

use chrono::{DateTime, Utc};
use fx_core::{
    CandleStore, Classifier, Direction, FeatureParams, InferenceConfig, PredictionRecord, Result,
};
use fx_features::{FeatureEngine, FeatureRow};
use tracing::{info, warn};

/// Result of one inference run.
///
/// `InsufficientHistory` is an expected steady-state condition (e.g.,
/// right after a cold start, before the warm-up windows fill) and is
/// deliberately not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// Predictions were scored and persisted.
    Predictions(Vec<PredictionRecord>),
    /// The engine produced no usable feature rows.
    InsufficientHistory,
}

/// Scores recent candles with a fitted classifier and persists the
/// resulting prediction records.
pub struct InferenceAdapter<S, C> {
    pair_name: String,
    config: InferenceConfig,
    engine: FeatureEngine,
    store: S,
    classifier: C,
}

impl<S: CandleStore, C: Classifier> InferenceAdapter<S, C> {
    /// Create an adapter. `params` must match the parameters the
    /// classifier was trained with; the feature schema is part of the
    /// model contract.
    pub fn new(
        pair_name: impl Into<String>,
        config: InferenceConfig,
        params: FeatureParams,
        store: S,
        classifier: C,
    ) -> Self {
        Self {
            pair_name: pair_name.into(),
            config,
            engine: FeatureEngine::new(params),
            store,
            classifier,
        }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Score only the most recent fully-computed feature row.
    pub fn run_single_shot(&mut self) -> Result<InferenceOutcome> {
        let rows = self.engineer_recent()?;
        let newest = rows.into_iter().last();
        self.score(newest.into_iter().collect())
    }

    /// Score every feature row strictly newer than `last_scored`,
    /// covering gaps when the caller runs on a coarser cadence than
    /// the candle resolution. `None` scores every available row.
    pub fn run_catch_up(
        &mut self,
        last_scored: Option<DateTime<Utc>>,
    ) -> Result<InferenceOutcome> {
        let mut rows = self.engineer_recent()?;
        if let Some(cutoff) = last_scored {
            rows.retain(|row| row.event_time() > cutoff);
        }
        self.score(rows)
    }

    fn engineer_recent(&self) -> Result<Vec<FeatureRow>> {
        let candles = self
            .store
            .fetch_recent(&self.pair_name, self.config.history_limit)?;
        self.engine.compute(&candles)
    }

    fn score(&mut self, rows: Vec<FeatureRow>) -> Result<InferenceOutcome> {
        if rows.is_empty() {
            warn!(pair = %self.pair_name, "not enough history to score");
            return Ok(InferenceOutcome::InsufficientHistory);
        }

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let [down, up] = self.classifier.predict_probability(&row.feature_vector())?;
            let direction = if up >= down {
                Direction::Up
            } else {
                Direction::Down
            };
            records.push(PredictionRecord {
                pair_name: self.pair_name.clone(),
                target_time: row.event_time(),
                direction,
                confidence: 100.0 * up.max(down),
            });
        }

        self.store.save_predictions(&records)?;
        info!(
            pair = %self.pair_name,
            scored = records.len(),
            newest = %records[records.len() - 1].target_time,
            "saved predictions"
        );
        Ok(InferenceOutcome::Predictions(records))
    }
}

//! The training adapter: candle history in, fitted classifier and
//! evaluation report out.

use fx_core::{CandleStore, Classifier, Error, FeatureParams, Result, TrainingConfig};
use fx_features::{FeatureEngine, FeatureRow};
use tracing::{info, warn};

use crate::report::{evaluate, TrainingReport};
use crate::split::chronological_split;

/// Result of one training run.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutcome {
    /// The classifier was fitted; the report describes the evaluation
    /// partition.
    Fitted(TrainingReport),
    /// Too little history to fit. Expected at cold start; the previous
    /// artifact (if any) stays in service.
    InsufficientData { candles: usize, required: usize },
}

/// Fits a classifier on engineered rows, split chronologically.
pub struct TrainingAdapter<S, C> {
    pair_name: String,
    config: TrainingConfig,
    engine: FeatureEngine,
    store: S,
    classifier: C,
}

impl<S: CandleStore, C: Classifier> TrainingAdapter<S, C> {
    /// Create an adapter around an unfitted (or stale) classifier.
    pub fn new(
        pair_name: impl Into<String>,
        config: TrainingConfig,
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

    /// The fitted classifier, for saving the artifact after a
    /// successful run.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Fetch history, engineer labeled rows, fit, and evaluate.
    pub fn run(&mut self) -> Result<TrainingOutcome> {
        let candles = self.store.fetch_all(&self.pair_name)?;
        let skip = candles.len().saturating_sub(self.config.history_limit);
        let candles = &candles[skip..];

        if candles.len() < self.config.min_candles {
            warn!(
                pair = %self.pair_name,
                candles = candles.len(),
                required = self.config.min_candles,
                "skipping training"
            );
            return Ok(TrainingOutcome::InsufficientData {
                candles: candles.len(),
                required: self.config.min_candles,
            });
        }

        let rows = self
            .engine
            .compute_labeled(candles, self.config.label_horizon)?;
        let (fit, eval) = chronological_split(&rows, self.config.fit_ratio)?;
        if fit.is_empty() || eval.is_empty() {
            return Ok(TrainingOutcome::InsufficientData {
                candles: candles.len(),
                required: self.config.min_candles,
            });
        }

        let (fit_features, fit_labels) = unzip_rows(fit)?;
        self.classifier.fit(&fit_features, &fit_labels)?;

        let (eval_features, eval_labels) = unzip_rows(eval)?;
        let mut predictions = Vec::with_capacity(eval_features.len());
        for features in &eval_features {
            predictions.push(self.classifier.predict(features)?);
        }
        let metrics = evaluate(&eval_labels, &predictions)?;

        info!(
            pair = %self.pair_name,
            fit_rows = fit.len(),
            eval_rows = eval.len(),
            accuracy = metrics.accuracy,
            "fitted classifier"
        );
        Ok(TrainingOutcome::Fitted(TrainingReport {
            pair_name: self.pair_name.clone(),
            schema: self.engine.schema(),
            fit_rows: fit.len(),
            eval_rows: eval.len(),
            metrics,
        }))
    }
}

/// Separate engineered rows into feature vectors and labels.
fn unzip_rows(rows: &[FeatureRow]) -> Result<(Vec<Vec<f64>>, Vec<u8>)> {
    let mut features = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());
    for row in rows {
        let label = row
            .label
            .ok_or_else(|| Error::config("unlabeled row in training partition"))?;
        features.push(row.feature_vector());
        labels.push(label);
    }
    Ok((features, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fx_core::{Candle, MajorityClassifier};
    use fx_store::MemoryCandleStore;

    fn candle(minute: i64, close: f64) -> Candle {
        Candle {
            pair_name: "USDJPY".to_string(),
            event_time: Utc.timestamp_opt(minute * 60, 0).unwrap(),
            open_price: close,
            high_price: close + 0.05,
            low_price: close - 0.05,
            close_price: close,
            volume: 2,
        }
    }

    fn seeded_store(n: usize) -> MemoryCandleStore {
        let mut store = MemoryCandleStore::new();
        let candles: Vec<Candle> = (0..n)
            .map(|i| candle(i as i64, 150.0 + (i as f64 * 0.7).sin()))
            .collect();
        store.upsert_candles(&candles).unwrap();
        store
    }

    fn adapter(n: usize) -> TrainingAdapter<MemoryCandleStore, MajorityClassifier> {
        TrainingAdapter::new(
            "USDJPY",
            TrainingConfig::default(),
            FeatureParams::default(),
            seeded_store(n),
            MajorityClassifier::new(),
        )
    }

    #[test]
    fn test_run_produces_report() {
        let mut adapter = adapter(120);
        let report = match adapter.run().unwrap() {
            TrainingOutcome::Fitted(report) => report,
            other => panic!("expected a fitted model, got {other:?}"),
        };

        // 120 candles, warm-up 20, horizon 5: 95 labeled rows.
        assert_eq!(report.fit_rows, 76);
        assert_eq!(report.eval_rows, 19);
        assert_eq!(report.schema.columns.len(), 11);
        assert!((0.0..=1.0).contains(&report.metrics.accuracy));
        assert_eq!(
            report.metrics.up.support + report.metrics.down.support,
            report.eval_rows
        );
    }

    #[test]
    fn test_classifier_is_fitted_after_run() {
        let mut adapter = adapter(120);
        adapter.run().unwrap();
        assert!(adapter.classifier().predict(&vec![0.0; 11]).is_ok());
    }

    #[test]
    fn test_too_few_candles_skips_fit() {
        let mut adapter = adapter(80); // below min_candles = 100
        match adapter.run().unwrap() {
            TrainingOutcome::InsufficientData { candles, required } => {
                assert_eq!(candles, 80);
                assert_eq!(required, 100);
            }
            other => panic!("expected insufficient data, got {other:?}"),
        }
        assert!(adapter.classifier().predict(&vec![0.0; 11]).is_err());
    }

    #[test]
    fn test_history_limit_caps_input() {
        let config = TrainingConfig {
            history_limit: 110,
            ..TrainingConfig::default()
        };
        let mut adapter = TrainingAdapter::new(
            "USDJPY",
            config,
            FeatureParams::default(),
            seeded_store(200),
            MajorityClassifier::new(),
        );
        let report = match adapter.run().unwrap() {
            TrainingOutcome::Fitted(report) => report,
            other => panic!("expected a fitted model, got {other:?}"),
        };
        // 110 candles -> 85 labeled rows -> 68/17 split.
        assert_eq!(report.fit_rows, 68);
        assert_eq!(report.eval_rows, 17);
    }

    #[test]
    fn test_bad_ratio_is_an_error() {
        let config = TrainingConfig {
            fit_ratio: 1.5,
            ..TrainingConfig::default()
        };
        let mut adapter = TrainingAdapter::new(
            "USDJPY",
            config,
            FeatureParams::default(),
            seeded_store(120),
            MajorityClassifier::new(),
        );
        assert!(matches!(adapter.run(), Err(Error::Config(_))));
    }
}

//! Configuration structures for the FX direction pipeline.
//!
//! All configuration is passed explicitly into constructors; there is
//! no process-global state, so every component can be unit-tested
//! without live external dependencies.

use serde::{Deserialize, Serialize};

/// Main configuration for one instrument's pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Instrument identifier.
    pub pair_name: String,
    /// Feature engineering parameters.
    pub features: FeatureParams,
    /// Training adapter parameters.
    pub training: TrainingConfig,
    /// Inference adapter parameters.
    pub inference: InferenceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pair_name: "USDJPY".to_string(),
            features: FeatureParams::default(),
            training: TrainingConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}

/// Feature engineering parameters.
///
/// Training and inference must run with identical parameters: the
/// feature schema is a function of this struct, and the classifier
/// only understands vectors from the schema it was fitted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureParams {
    /// Trailing window for the simple moving average.
    pub sma_window: usize,
    /// Trailing window for the RSI-style momentum oscillator.
    pub rsi_window: usize,
    /// Number of lagged return columns (offsets `1..=lag_depth`).
    pub lag_depth: usize,
    /// Enable the extended indicator set (EMA, MACD, Bollinger, ATR).
    /// Changes the feature schema version.
    pub extended: bool,
    /// EMA window (extended schema).
    pub ema_window: usize,
    /// MACD fast EMA window (extended schema).
    pub macd_fast: usize,
    /// MACD slow EMA window (extended schema).
    pub macd_slow: usize,
    /// MACD signal EMA window (extended schema).
    pub macd_signal: usize,
    /// Bollinger band window (extended schema).
    pub bb_window: usize,
    /// Bollinger band width in standard deviations (extended schema).
    pub bb_mult: f64,
    /// ATR window (extended schema).
    pub atr_window: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            sma_window: 20,
            rsi_window: 14,
            lag_depth: 3,
            extended: false,
            ema_window: 12,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_window: 20,
            bb_mult: 2.0,
            atr_window: 14,
        }
    }
}

/// Training adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Forward horizon (periods) for the binary label.
    pub label_horizon: usize,
    /// Leading fraction of engineered rows used for fitting; the
    /// trailing remainder is the evaluation partition.
    pub fit_ratio: f64,
    /// Maximum number of recent candles to train on.
    pub history_limit: usize,
    /// Minimum raw candles required before attempting a fit.
    pub min_candles: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            label_horizon: 5,
            fit_ratio: 0.8,
            history_limit: 5000,
            min_candles: 100,
        }
    }
}

/// Inference adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Recent candles fetched per run. Must comfortably exceed the
    /// indicator warm-up so at least one feature row survives.
    pub history_limit: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pair_name, "USDJPY");
        assert_eq!(config.features.sma_window, 20);
        assert_eq!(config.features.rsi_window, 14);
        assert_eq!(config.features.lag_depth, 3);
        assert!(!config.features.extended);
        assert_eq!(config.training.label_horizon, 5);
        assert_eq!(config.training.fit_ratio, 0.8);
        assert_eq!(config.inference.history_limit, 100);
    }
}

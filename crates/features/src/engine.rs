//! The candles -> feature-rows transformation.
//!
//! Two explicit passes: first every derived column is computed with an
//! `Option` sentinel marking warm-up, then rows with any undefined
//! column are dropped. Nothing is imputed, forward-filled, or
//! interpolated.
//!
//! Feature values never depend on whether a label was requested, so a
//! training run and an inference run over the same candles agree
//! byte-for-byte on every shared row.

use chrono::{DateTime, Utc};
use fx_core::{Candle, Error, FeatureParams, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{BollingerBands, Ema, Macd, RollingAtr, RollingRsi, RollingSma};

/// Schema version of the base feature set.
pub const SCHEMA_VERSION_BASE: u16 = 1;
/// Schema version of the extended feature set.
pub const SCHEMA_VERSION_EXTENDED: u16 = 2;

/// One candle enriched with derived numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Source candle.
    pub candle: Candle,
    /// Simple moving average of the close.
    pub sma: f64,
    /// Momentum oscillator value in `[0, 100]`.
    pub rsi: f64,
    /// Simple percent change of the close vs. the previous candle.
    pub returns: f64,
    /// `returns` from 1..=lag_depth rows earlier.
    pub lag_returns: Vec<f64>,
    /// Extended indicator set; present only when enabled in the
    /// engine parameters.
    pub extended: Option<ExtendedIndicators>,
    /// Binary outcome (1 = close rose over the horizon); present only
    /// in training mode.
    pub label: Option<u8>,
}

/// The optional richer indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedIndicators {
    pub ema: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub atr: f64,
}

impl FeatureRow {
    /// Timestamp of the underlying candle.
    #[inline]
    pub fn event_time(&self) -> DateTime<Utc> {
        self.candle.event_time
    }

    /// The numeric columns handed to the classifier, in schema order.
    /// Identifier and label columns are excluded.
    pub fn feature_vector(&self) -> Vec<f64> {
        let mut v = Vec::with_capacity(8 + self.lag_returns.len() + 7);
        v.push(self.candle.open_price);
        v.push(self.candle.high_price);
        v.push(self.candle.low_price);
        v.push(self.candle.close_price);
        v.push(self.candle.volume as f64);
        v.push(self.sma);
        v.push(self.rsi);
        v.push(self.returns);
        v.extend_from_slice(&self.lag_returns);
        if let Some(ext) = &self.extended {
            v.push(ext.ema);
            v.push(ext.macd);
            v.push(ext.macd_signal);
            v.push(ext.macd_hist);
            v.push(ext.bb_upper);
            v.push(ext.bb_lower);
            v.push(ext.atr);
        }
        v
    }
}

/// Versioned description of the feature columns.
///
/// Training and inference must agree on this exactly; a classifier
/// artifact is only meaningful for the schema it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u16,
    pub columns: Vec<String>,
}

/// Pure transformation from a single instrument's candle sequence to
/// feature rows.
pub struct FeatureEngine {
    params: FeatureParams,
}

/// Pass-1 working state: every derived column still carries its
/// warm-up sentinel.
struct DraftRow {
    sma: Option<f64>,
    rsi: Option<f64>,
    returns: Option<f64>,
    extended: Option<ExtendedIndicators>,
}

impl FeatureEngine {
    /// Create an engine with the given parameters.
    pub fn new(params: FeatureParams) -> Self {
        Self { params }
    }

    /// The engine's parameters.
    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    /// Column names and version of the vectors this engine produces.
    pub fn schema(&self) -> FeatureSchema {
        let mut columns: Vec<String> = [
            "open_price",
            "high_price",
            "low_price",
            "close_price",
            "volume",
            "sma",
            "rsi",
            "returns",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        for k in 1..=self.params.lag_depth {
            columns.push(format!("lag_returns_{k}"));
        }
        let version = if self.params.extended {
            for name in [
                "ema",
                "macd",
                "macd_signal",
                "macd_hist",
                "bb_upper",
                "bb_lower",
                "atr",
            ] {
                columns.push(name.to_string());
            }
            SCHEMA_VERSION_EXTENDED
        } else {
            SCHEMA_VERSION_BASE
        };
        FeatureSchema { version, columns }
    }

    /// Inference mode: engineer features with no label column.
    ///
    /// An empty result means the input did not cover the warm-up
    /// windows ("no signal yet"), not a failure.
    pub fn compute(&self, candles: &[Candle]) -> Result<Vec<FeatureRow>> {
        self.engineer(candles, None)
    }

    /// Training mode: engineer features plus a binary label per row,
    /// looking `label_horizon` candles ahead.
    pub fn compute_labeled(
        &self,
        candles: &[Candle],
        label_horizon: usize,
    ) -> Result<Vec<FeatureRow>> {
        if label_horizon == 0 {
            return Err(Error::config("label_horizon must be at least 1"));
        }
        self.engineer(candles, Some(label_horizon))
    }

    fn engineer(
        &self,
        candles: &[Candle],
        label_horizon: Option<usize>,
    ) -> Result<Vec<FeatureRow>> {
        let candles = sort_and_check(candles)?;
        let n = candles.len();

        // Pass 1: compute every derived column with warm-up sentinels.
        let mut sma = RollingSma::new(self.params.sma_window);
        let mut rsi = RollingRsi::new(self.params.rsi_window);
        let mut extended = self
            .params
            .extended
            .then(|| ExtendedCalculators::new(&self.params));

        let mut drafts = Vec::with_capacity(n);
        let mut returns = Vec::with_capacity(n);
        let mut prev_close = None;
        for candle in &candles {
            let close = candle.close_price;
            let ret = prev_close.map(|prev: f64| (close - prev) / prev);
            prev_close = Some(close);
            returns.push(ret);

            drafts.push(DraftRow {
                sma: sma.push(close),
                rsi: rsi.push(close),
                returns: ret,
                extended: extended.as_mut().and_then(|calc| calc.push(candle)),
            });
        }

        let labels = match label_horizon {
            Some(h) => labels(&candles, h),
            None => vec![None; n],
        };

        // Pass 2: keep only rows where every requested column is
        // defined.
        let mut rows = Vec::new();
        for (i, (candle, draft)) in candles.iter().zip(&drafts).enumerate() {
            let lag_values = lag_window(&returns, i, self.params.lag_depth);
            let complete = draft.sma.is_some()
                && draft.rsi.is_some()
                && draft.returns.is_some()
                && lag_values.is_some()
                && (!self.params.extended || draft.extended.is_some())
                && (label_horizon.is_none() || labels[i].is_some());
            if !complete {
                continue;
            }

            rows.push(FeatureRow {
                candle: candle.clone(),
                sma: draft.sma.unwrap_or_default(),
                rsi: draft.rsi.unwrap_or_default(),
                returns: draft.returns.unwrap_or_default(),
                lag_returns: lag_values.unwrap_or_default(),
                extended: draft.extended.clone(),
                label: labels[i],
            });
        }

        debug!(
            candles = n,
            rows = rows.len(),
            labeled = label_horizon.is_some(),
            "engineered feature rows"
        );
        Ok(rows)
    }
}

/// Bundle of the extended calculators, advanced in lockstep.
struct ExtendedCalculators {
    ema: Ema,
    macd: Macd,
    bands: BollingerBands,
    atr: RollingAtr,
}

impl ExtendedCalculators {
    fn new(params: &FeatureParams) -> Self {
        Self {
            ema: Ema::new(params.ema_window),
            macd: Macd::new(params.macd_fast, params.macd_slow, params.macd_signal),
            bands: BollingerBands::new(params.bb_window, params.bb_mult),
            atr: RollingAtr::new(params.atr_window),
        }
    }

    fn push(&mut self, candle: &Candle) -> Option<ExtendedIndicators> {
        let close = candle.close_price;
        let ema = self.ema.push(close);
        let macd = self.macd.push(close);
        let bands = self.bands.push(close);
        let atr = self.atr.push(candle);
        match (ema, macd, bands, atr) {
            (Some(ema), Some(macd), Some((bb_upper, bb_lower)), Some(atr)) => {
                Some(ExtendedIndicators {
                    ema,
                    macd: macd.macd,
                    macd_signal: macd.signal,
                    macd_hist: macd.histogram,
                    bb_upper,
                    bb_lower,
                    atr,
                })
            }
            _ => None,
        }
    }
}

/// Sort ascending by `event_time` and reject duplicate timestamps.
fn sort_and_check(candles: &[Candle]) -> Result<Vec<Candle>> {
    let mut sorted = candles.to_vec();
    sorted.sort_by_key(|c| c.event_time);
    for pair in sorted.windows(2) {
        if pair[0].event_time == pair[1].event_time {
            return Err(Error::ordering(
                pair[0].pair_name.clone(),
                pair[0].event_time,
            ));
        }
    }
    Ok(sorted)
}

/// Binary labels over a forward horizon: 1 when the close `horizon`
/// rows ahead is strictly greater, `None` for the last `horizon` rows.
fn labels(candles: &[Candle], horizon: usize) -> Vec<Option<u8>> {
    let n = candles.len();
    (0..n)
        .map(|i| {
            let future = i.checked_add(horizon).filter(|&j| j < n)?;
            Some(u8::from(
                candles[future].close_price > candles[i].close_price,
            ))
        })
        .collect()
}

/// The lag columns for row `i`: `returns` from 1..=depth rows earlier.
/// `None` until every offset is available.
fn lag_window(returns: &[Option<f64>], i: usize, depth: usize) -> Option<Vec<f64>> {
    (1..=depth)
        .map(|k| i.checked_sub(k).and_then(|j| returns[j]))
        .collect()
}

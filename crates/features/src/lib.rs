//! Feature engineering for the FX direction pipeline.
//!
//! This crate handles:
//! - Rolling indicator calculators (SMA, RSI, EMA, MACD, Bollinger, ATR)
//! - The candles -> feature-rows transformation
//! - Forward-looking binary label construction
//! - Warm-up elimination (drop, never impute)
//!
//! The transformation is a pure function of its input and is invoked
//! identically at training and inference time.

pub mod engine;
pub mod indicators;

pub use engine::{ExtendedIndicators, FeatureEngine, FeatureRow, FeatureSchema};
pub use indicators::{BollingerBands, Ema, Macd, RollingAtr, RollingRsi, RollingSma};

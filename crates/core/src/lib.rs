//! Core types and contracts for the FX direction pipeline.
//!
//! This crate provides everything shared across the workspace:
//! - Market data and prediction types
//! - Configuration structures
//! - Common error types
//! - Boundary traits for candle storage and classification

pub mod classifier;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use classifier::{Classifier, MajorityClassifier};
pub use config::{Config, FeatureParams, InferenceConfig, TrainingConfig};
pub use error::{Error, Result};
pub use store::CandleStore;
pub use types::{Candle, Direction, PredictionRecord};

//! Classifier training for the FX direction pipeline.
//!
//! This crate handles:
//! - The chronological fit/evaluation split (never shuffled)
//! - Driving the external classifier's `fit`
//! - The evaluation report (accuracy, per-class precision/recall)

pub mod adapter;
pub mod report;
pub mod split;

pub use adapter::{TrainingAdapter, TrainingOutcome};
pub use report::{ClassMetrics, EvalMetrics, TrainingReport};
pub use split::chronological_split;

//! Live scoring for the FX direction pipeline.
//!
//! This crate handles:
//! - Loading the classifier artifact (missing file is a distinct,
//!   fatal condition — never an auto-retrain)
//! - Single-shot and catch-up scoring over recent candles
//! - Building and persisting prediction records

pub mod adapter;
pub mod artifact;

pub use adapter::{InferenceAdapter, InferenceOutcome};
pub use artifact::load_classifier;

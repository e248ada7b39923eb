//! Candle and prediction storage for the FX direction pipeline.
//!
//! This crate provides the [`fx_core::CandleStore`] implementations:
//! - An in-memory store for tests and dry runs
//! - A SQLite store for durable single-node deployments
//!
//! Both honor replace-on-conflict semantics on the natural keys
//! `(pair_name, event_time)` for candles and
//! `(pair_name, target_time)` for predictions.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryCandleStore;
pub use sqlite::SqliteCandleStore;

//! Data processing layer for the Running Analyzer.
//!
//! Responsible for reading raw activity exports, cleaning them into the
//! canonical dataset, persisting and reloading that dataset, and computing
//! the aggregated views served to the presentation layer.

pub mod aggregator;
pub mod cleaner;
pub mod metrics;
pub mod pipeline;
pub mod reader;
pub mod store;

pub use analyzer_core as core;

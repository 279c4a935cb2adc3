//! Runtime layer for the Running Analyzer.
//!
//! Owns the lazily-loaded canonical dataset and exposes the query
//! operations consumed by the presentation layer.

pub mod data_manager;

pub use analyzer_core as core;
pub use analyzer_data as data;

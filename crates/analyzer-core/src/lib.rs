//! Domain model for the Running Analyzer.
//!
//! Holds the activity record and dataset types, the shared error type,
//! command-line settings and the cell-level date and number parsers used by
//! both the raw and canonical readers.

pub mod data_processors;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{AnalyzerError, Result};

//! Raw-to-canonical processing pipeline.
//!
//! Loads the raw export, cleans it and persists the result, returning the
//! dataset together with a [`ProcessingReport`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use analyzer_core::error::Result;
use analyzer_core::models::Dataset;
use serde::Serialize;
use tracing::info;

use crate::cleaner::{clean, CleaningReport};
use crate::reader::load_raw_table;
use crate::store::persist;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a processed dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub raw_path: PathBuf,
    pub canonical_path: PathBuf,
    pub cleaning: CleaningReport,
    /// `true` when the source carried average speed and pace was derived.
    pub pace_derived: bool,
    /// `true` when the source carried average cadence.
    pub cadence_corrected: bool,
    pub load_time_seconds: f64,
    pub clean_time_seconds: f64,
}

/// Output of [`process_raw_data`].
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub dataset: Dataset,
    pub report: ProcessingReport,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline: load `raw_path`, clean it and write the canonical
/// file to `canonical_path`.
///
/// Errors from any step are returned unchanged; nothing is written when
/// loading or cleaning fails.
pub fn process_raw_data(raw_path: &Path, canonical_path: &Path) -> Result<ProcessingResult> {
    info!("processing raw data from {}", raw_path.display());

    let load_start = Instant::now();
    let table = load_raw_table(raw_path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let clean_start = Instant::now();
    let (dataset, cleaning) = clean(&table)?;
    let clean_time = clean_start.elapsed().as_secs_f64();

    persist(&dataset, canonical_path)?;

    info!(
        rows_read = cleaning.rows_read,
        rows_kept = cleaning.rows_kept,
        "raw data processed"
    );

    let report = ProcessingReport {
        raw_path: raw_path.to_path_buf(),
        canonical_path: canonical_path.to_path_buf(),
        cleaning,
        pace_derived: dataset.has_speed_data(),
        cadence_corrected: dataset.has_cadence_data(),
        load_time_seconds: load_time,
        clean_time_seconds: clean_time,
    };

    Ok(ProcessingResult { dataset, report })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

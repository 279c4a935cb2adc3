//! Cleaning of a projected raw table into the canonical [`Dataset`].
//!
//! Steps, in order:
//! 1. keep rows whose activity type is exactly `"Run"`;
//! 2. parse the activity date (any failure aborts the whole table);
//! 3. when average speed is present, derive km/h and pace and drop rows
//!    outside the plausible pace band;
//! 4. when average cadence is present, double it (unparseable → 0).
//!
//! Cleaning is only defined for raw input. Running it over canonical data
//! would double cadence a second time.

use analyzer_core::data_processors::{DateParser, NumberParser};
use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{ActivityRecord, Column, Dataset, RUN_KIND};
use serde::Serialize;
use tracing::debug;

use crate::metrics::{correct_cadence, is_plausible_pace, pace_from_km_h, speed_to_km_h};
use crate::reader::RawTable;

// ── CleaningReport ────────────────────────────────────────────────────────────

/// Row counts observed while cleaning one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub dropped_by_kind: usize,
    pub dropped_by_pace: usize,
    pub rows_kept: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Clean `table` into a dataset.
///
/// `activity type` and `activity date` are required; every other column is
/// optional and the steps depending on it are skipped when it is absent.
pub fn clean(table: &RawTable) -> Result<(Dataset, CleaningReport)> {
    let type_idx = require_column(table, Column::ActivityType)?;
    let date_idx = require_column(table, Column::ActivityDate)?;
    let id_idx = table.index_of(Column::ActivityId);
    let speed_present = table.has_column(Column::AverageSpeed);
    let cadence_present = table.has_column(Column::AverageCadence);

    let numeric_columns: Vec<(Column, usize)> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_numeric())
        .map(|(i, c)| (*c, i))
        .collect();

    let mut report = CleaningReport {
        rows_read: table.len(),
        ..CleaningReport::default()
    };
    let mut records = Vec::new();

    for (row_no, row) in table.rows.iter().enumerate() {
        if row[type_idx] != RUN_KIND {
            report.dropped_by_kind += 1;
            continue;
        }

        let raw_date = &row[date_idx];
        let activity_date = DateParser::parse(raw_date).ok_or_else(|| {
            AnalyzerError::malformed(
                &table.path,
                format!("row {}: unparseable activity date {:?}", row_no + 1, raw_date),
            )
        })?;

        let mut record = ActivityRecord::new(activity_date, RUN_KIND);
        record.activity_id = id_idx.and_then(|i| NumberParser::parse_id(&row[i]));

        for &(column, idx) in &numeric_columns {
            let cell = &row[idx];
            let value = NumberParser::parse_f64(cell);
            if value.is_none() && !NumberParser::is_blank(cell) {
                debug!(
                    "row {}: non-numeric {} value {:?} treated as missing",
                    row_no + 1,
                    column.header(),
                    cell
                );
            }
            record.set_numeric(column, value);
        }

        if speed_present {
            let km_h = record.average_speed.map(speed_to_km_h);
            let pace = pace_from_km_h(km_h.unwrap_or(0.0));
            if !is_plausible_pace(pace) {
                report.dropped_by_pace += 1;
                continue;
            }
            record.average_km_h = km_h;
            record.pace = Some(pace);
        }

        if cadence_present {
            record.average_cadence = Some(correct_cadence(record.average_cadence));
        }

        records.push(record);
    }

    report.rows_kept = records.len();

    let mut columns = table.columns.clone();
    if speed_present {
        columns.extend(Column::DERIVED);
    }

    debug!(
        "cleaned {}: {} read, {} not runs, {} outside pace band, {} kept",
        table.path.display(),
        report.rows_read,
        report.dropped_by_kind,
        report.dropped_by_pace,
        report.rows_kept
    );

    Ok((Dataset::new(columns, records), report))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn require_column(table: &RawTable, column: Column) -> Result<usize> {
    table.index_of(column).ok_or_else(|| {
        AnalyzerError::malformed(
            &table.path,
            format!("required column {:?} is missing", column.header()),
        )
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

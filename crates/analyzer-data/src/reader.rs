//! Raw activity export loading.
//!
//! Reads the CSV export as received from the tracking platform, normalises
//! its headers and projects it onto the fixed list of relevant columns.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{normalize_header, Column};
use tracing::debug;

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Projected, still untyped, view of a raw export.
///
/// `rows[i][j]` is the cell of row `i` for `columns[j]`.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// File the table was read from, used in error messages.
    pub path: PathBuf,
    /// Relevant columns present in the source, in projection order.
    pub columns: Vec<Column>,
    /// Projected cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Position of `column` within each projected row.
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a raw export from `path`.
///
/// Fails with [`AnalyzerError::SourceNotFound`] when the file cannot be
/// opened and [`AnalyzerError::MalformedSource`] when it is not a readable
/// table. Relevant columns missing from the export are simply left out.
pub fn load_raw_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| AnalyzerError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    read_raw_table(BufReader::new(file), path)
}

/// Same as [`load_raw_table`] but reads from any reader; `path` is only used
/// to label errors.
///
/// Rows shorter than the header are padded with empty cells, since exports
/// drop trailing empty fields. Rows longer than the header are malformed.
pub fn read_raw_table<R: Read>(reader: R, path: &Path) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| AnalyzerError::malformed(path, e.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AnalyzerError::malformed(path, "missing header row"));
    }

    let (columns, positions) = project_headers(&headers);
    debug!(
        "{}: {} headers, {} relevant columns kept",
        path.display(),
        headers.len(),
        columns.len()
    );

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| AnalyzerError::malformed(path, e.to_string()))?;
        if record.len() > headers.len() {
            return Err(AnalyzerError::malformed(
                path,
                format!(
                    "row {}: found {} fields, expected {}",
                    row_no + 1,
                    record.len(),
                    headers.len()
                ),
            ));
        }
        let row = positions
            .iter()
            .map(|&pos| record.get(pos).unwrap_or_default().to_string())
            .collect();
        rows.push(row);
    }

    debug!("{}: {} rows read", path.display(), rows.len());

    Ok(RawTable {
        path: path.to_path_buf(),
        columns,
        rows,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Intersect normalised `headers` with [`Column::RELEVANT`].
///
/// Returns the kept columns in relevant-list order together with their
/// position in the source header. Duplicate headers resolve to their first
/// occurrence.
fn project_headers(headers: &[String]) -> (Vec<Column>, Vec<usize>) {
    let mut columns = Vec::new();
    let mut positions = Vec::new();

    for column in Column::RELEVANT {
        if let Some(pos) = headers.iter().position(|h| h == column.header()) {
            columns.push(column);
            positions.push(pos);
        }
    }

    (columns, positions)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

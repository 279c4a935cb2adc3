//! Canonical dataset file I/O.
//!
//! The canonical file is a plain CSV with a header row and no index column.
//! Dates are written as `YYYY-MM-DD HH:MM:SS` and re-parsed on every load;
//! missing values are empty cells.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use analyzer_core::data_processors::{DateParser, NumberParser};
use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{normalize_header, ActivityRecord, Column, Dataset};
use tracing::{debug, info};

// ── Persist ───────────────────────────────────────────────────────────────────

/// Write `dataset` to `path`, replacing any previous content.
///
/// Parent directories are created as needed.
pub fn persist(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_dataset(dataset, file)?;

    info!("persisted {} runs to {}", dataset.len(), path.display());
    Ok(())
}

/// Serialise `dataset` as CSV into any writer.
pub fn write_dataset<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let columns = dataset.columns();

    csv_writer
        .write_record(columns.iter().map(|c| c.header()))
        .map_err(std::io::Error::from)?;

    for record in dataset.records() {
        csv_writer
            .write_record(columns.iter().map(|c| format_cell(record, *c)))
            .map_err(std::io::Error::from)?;
    }

    csv_writer.flush()?;
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read a canonical dataset back from `path`.
///
/// Cadence is taken as stored; it was already corrected when the file was
/// produced. Unknown columns are ignored.
pub fn load(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| AnalyzerError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(BufReader::new(file), path)?;
    info!("loaded {} runs from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Same as [`load`] but reads from any reader; `path` only labels errors.
pub fn read_dataset<R: Read>(reader: R, path: &Path) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalyzerError::malformed(path, e.to_string()))?
        .clone();

    let mut columns: Vec<(Column, usize)> = Vec::new();
    for (pos, header) in headers.iter().enumerate() {
        let name = normalize_header(header);
        match Column::from_header(&name) {
            Some(column) if !columns.iter().any(|(c, _)| *c == column) => {
                columns.push((column, pos));
            }
            Some(_) => debug!("{}: duplicate column {:?} ignored", path.display(), name),
            None => debug!("{}: unknown column {:?} ignored", path.display(), name),
        }
    }

    let position = |column: Column| {
        columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, pos)| *pos)
            .ok_or_else(|| {
                AnalyzerError::malformed(
                    path,
                    format!("required column {:?} is missing", column.header()),
                )
            })
    };
    let date_pos = position(Column::ActivityDate)?;
    let type_pos = position(Column::ActivityType)?;

    let mut records = Vec::new();
    for (row_no, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|e| AnalyzerError::malformed(path, e.to_string()))?;
        let cell = |pos: usize| row.get(pos).unwrap_or_default();
        let line = row_no + 1;

        let activity_date = DateParser::parse(cell(date_pos)).ok_or_else(|| {
            AnalyzerError::malformed(
                path,
                format!("row {}: unparseable activity date {:?}", line, cell(date_pos)),
            )
        })?;
        let mut record = ActivityRecord::new(activity_date, cell(type_pos));

        for &(column, pos) in &columns {
            let raw = cell(pos);
            if column == Column::ActivityId {
                record.activity_id = parse_strict(raw, NumberParser::parse_id, path, line, column)?;
            } else if column.is_numeric() {
                let value = parse_strict(raw, NumberParser::parse_f64, path, line, column)?;
                record.set_numeric(column, value);
            }
        }

        records.push(record);
    }

    Ok(Dataset::new(
        columns.into_iter().map(|(c, _)| c).collect(),
        records,
    ))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_cell(record: &ActivityRecord, column: Column) -> String {
    match column {
        Column::ActivityId => record
            .activity_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        Column::ActivityDate => DateParser::format(&record.activity_date),
        Column::ActivityType => record.activity_type.clone(),
        numeric => record
            .numeric(numeric)
            .map(|v| v.to_string())
            .unwrap_or_default(),
    }
}

/// Blank cells are `None`; anything else must parse.
fn parse_strict<T>(
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
    path: &Path,
    line: usize,
    column: Column,
) -> Result<Option<T>> {
    if NumberParser::is_blank(raw) {
        return Ok(None);
    }
    parse(raw).map(Some).ok_or_else(|| {
        AnalyzerError::malformed(
            path,
            format!("row {}: invalid {} value {:?}", line, column.header(), raw),
        )
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn run(day: u32, distance: f64, pace: f64, cadence: Option<f64>) -> ActivityRecord {
        let date = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(6, 45, 10)
            .unwrap();
        let mut r = ActivityRecord::new(date, "Run");
        r.activity_id = Some(1000 + day as i64);
        r.distance = Some(distance);
        r.average_speed = Some(60.0 / pace / 3.6);
        r.average_km_h = Some(60.0 / pace);
        r.pace = Some(pace);
        r.average_cadence = cadence;
        r
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                Column::ActivityId,
                Column::ActivityDate,
                Column::ActivityType,
                Column::Distance,
                Column::AverageSpeed,
                Column::AverageCadence,
                Column::AverageKmH,
                Column::Pace,
            ],
            vec![
                run(1, 5.2, 5.5, Some(170.0)),
                run(3, 10.0, 1.0 / 3.0 * 16.0, None),
                run(2, 21.1, 6.25, Some(0.0)),
            ],
        )
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed").join("clean.csv");
        let original = sample();

        persist(&original, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        assert_eq!(loaded.columns(), original.columns());
        for (a, b) in loaded.records().iter().zip(original.records()) {
            assert_eq!(a.distance, b.distance);
            assert_eq!(a.pace, b.pace);
            assert_eq!(a.activity_date, b.activity_date);
            assert_eq!(a.activity_id, b.activity_id);
        }
    }

    #[test]
    fn test_load_does_not_redouble_cadence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.csv");
        persist(&sample(), &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.records()[0].average_cadence, Some(170.0));
        assert_eq!(loaded.records()[1].average_cadence, None);
        assert!(loaded.has_cadence_data());
        assert!(loaded.has_speed_data());
    }

    #[test]
    fn test_written_header_and_dates() {
        let mut buf = Vec::new();
        write_dataset(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "activity id,activity date,activity type,distance,average speed,average cadence,average_km_h,pace"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("1001,2024-05-01 06:45:10,Run,5.2,"));
        // Missing cadence is an empty cell.
        let second: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(second[5], "");
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.csv");
        persist(&sample(), &path).unwrap();

        let smaller = Dataset::new(sample().columns().to_vec(), vec![run(9, 3.0, 6.0, None)]);
        persist(&smaller, &path).unwrap();

        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/tmp/does-not-exist-analyzer-clean.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::SourceNotFound { .. }));
    }

    #[test]
    fn test_load_bad_date_is_malformed() {
        let data = "activity date,activity type,distance\nsometime,Run,5\n";
        let err = read_dataset(data.as_bytes(), Path::new("clean.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedSource { .. }));
    }

    #[test]
    fn test_load_bad_number_is_malformed() {
        let data = "activity date,activity type,distance\n2024-01-01,Run,five\n";
        let err = read_dataset(data.as_bytes(), Path::new("clean.csv")).unwrap_err();
        match err {
            AnalyzerError::MalformedSource { reason, .. } => assert!(reason.contains("distance")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_ignores_unknown_columns() {
        let data = "activity date,activity type,week,distance\n2024-01-01 00:00:00,Run,1,5\n";
        let ds = read_dataset(data.as_bytes(), Path::new("clean.csv")).unwrap();
        assert_eq!(
            ds.columns(),
            &[Column::ActivityDate, Column::ActivityType, Column::Distance]
        );
        assert_eq!(ds.records()[0].distance, Some(5.0));
    }

    #[test]
    fn test_load_without_key_column_is_malformed() {
        let data = "distance\n5\n";
        let err = read_dataset(data.as_bytes(), Path::new("clean.csv")).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedSource { .. }));
    }
}

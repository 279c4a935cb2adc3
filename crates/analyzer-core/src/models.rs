use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Label an activity must carry to survive cleaning.
pub const RUN_KIND: &str = "Run";

// ── Column ────────────────────────────────────────────────────────────────────

/// A column of the activity table, either taken from the export or derived
/// by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    ActivityId,
    ActivityDate,
    ActivityType,
    ElapsedTime,
    Distance,
    MaxHeartRate,
    AverageHeartRate,
    ElevationGain,
    ElevationLoss,
    MaxSpeed,
    AverageSpeed,
    MaxCadence,
    AverageCadence,
    Calories,
    AverageKmH,
    Pace,
}

impl Column {
    /// Export columns kept by the loader, in projection order.
    pub const RELEVANT: [Column; 14] = [
        Column::ActivityId,
        Column::ActivityDate,
        Column::ActivityType,
        Column::ElapsedTime,
        Column::Distance,
        Column::MaxHeartRate,
        Column::AverageHeartRate,
        Column::ElevationGain,
        Column::ElevationLoss,
        Column::MaxSpeed,
        Column::AverageSpeed,
        Column::MaxCadence,
        Column::AverageCadence,
        Column::Calories,
    ];

    /// Columns computed from `average speed` and appended after the export
    /// columns.
    pub const DERIVED: [Column; 2] = [Column::AverageKmH, Column::Pace];

    /// Normalised header name as it appears in both raw and canonical files.
    pub fn header(self) -> &'static str {
        match self {
            Column::ActivityId => "activity id",
            Column::ActivityDate => "activity date",
            Column::ActivityType => "activity type",
            Column::ElapsedTime => "elapsed time",
            Column::Distance => "distance",
            Column::MaxHeartRate => "max heart rate",
            Column::AverageHeartRate => "average heart rate",
            Column::ElevationGain => "elevation gain",
            Column::ElevationLoss => "elevation loss",
            Column::MaxSpeed => "max speed",
            Column::AverageSpeed => "average speed",
            Column::MaxCadence => "max cadence",
            Column::AverageCadence => "average cadence",
            Column::Calories => "calories",
            Column::AverageKmH => "average_km_h",
            Column::Pace => "pace",
        }
    }

    /// Resolve an already-normalised header to a known column.
    pub fn from_header(header: &str) -> Option<Column> {
        Column::RELEVANT
            .iter()
            .chain(Column::DERIVED.iter())
            .copied()
            .find(|c| c.header() == header)
    }

    /// `true` for columns holding an optional floating-point measurement.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Column::ActivityId | Column::ActivityDate | Column::ActivityType
        )
    }
}

/// Lower-case a header and trim surrounding whitespace.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

// ── ActivityRecord ────────────────────────────────────────────────────────────

/// One workout after cleaning.
///
/// Every measurement is optional: a column missing from the source or an
/// empty cell both end up as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub activity_id: Option<i64>,
    /// Local wall-clock time of the activity; no timezone is assumed.
    pub activity_date: NaiveDateTime,
    pub activity_type: String,
    /// Seconds.
    pub elapsed_time: Option<f64>,
    /// Kilometres.
    pub distance: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub average_heart_rate: Option<f64>,
    /// Metres.
    pub elevation_gain: Option<f64>,
    /// Metres.
    pub elevation_loss: Option<f64>,
    /// Metres per second, as exported.
    pub max_speed: Option<f64>,
    /// Metres per second, as exported.
    pub average_speed: Option<f64>,
    pub max_cadence: Option<f64>,
    /// Steps per minute, already doubled from the single-leg raw count.
    pub average_cadence: Option<f64>,
    pub calories: Option<f64>,
    pub average_km_h: Option<f64>,
    /// Minutes per kilometre.
    pub pace: Option<f64>,
}

impl ActivityRecord {
    /// Create a record with only the key fields set.
    pub fn new(activity_date: NaiveDateTime, activity_type: impl Into<String>) -> Self {
        Self {
            activity_id: None,
            activity_date,
            activity_type: activity_type.into(),
            elapsed_time: None,
            distance: None,
            max_heart_rate: None,
            average_heart_rate: None,
            elevation_gain: None,
            elevation_loss: None,
            max_speed: None,
            average_speed: None,
            max_cadence: None,
            average_cadence: None,
            calories: None,
            average_km_h: None,
            pace: None,
        }
    }

    /// Read a numeric column. Returns `None` for the non-numeric key columns.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::ElapsedTime => self.elapsed_time,
            Column::Distance => self.distance,
            Column::MaxHeartRate => self.max_heart_rate,
            Column::AverageHeartRate => self.average_heart_rate,
            Column::ElevationGain => self.elevation_gain,
            Column::ElevationLoss => self.elevation_loss,
            Column::MaxSpeed => self.max_speed,
            Column::AverageSpeed => self.average_speed,
            Column::MaxCadence => self.max_cadence,
            Column::AverageCadence => self.average_cadence,
            Column::Calories => self.calories,
            Column::AverageKmH => self.average_km_h,
            Column::Pace => self.pace,
            Column::ActivityId | Column::ActivityDate | Column::ActivityType => None,
        }
    }

    /// Write a numeric column. Writes to key columns are ignored.
    pub fn set_numeric(&mut self, column: Column, value: Option<f64>) {
        let slot = match column {
            Column::ElapsedTime => &mut self.elapsed_time,
            Column::Distance => &mut self.distance,
            Column::MaxHeartRate => &mut self.max_heart_rate,
            Column::AverageHeartRate => &mut self.average_heart_rate,
            Column::ElevationGain => &mut self.elevation_gain,
            Column::ElevationLoss => &mut self.elevation_loss,
            Column::MaxSpeed => &mut self.max_speed,
            Column::AverageSpeed => &mut self.average_speed,
            Column::MaxCadence => &mut self.max_cadence,
            Column::AverageCadence => &mut self.average_cadence,
            Column::Calories => &mut self.calories,
            Column::AverageKmH => &mut self.average_km_h,
            Column::Pace => &mut self.pace,
            Column::ActivityId | Column::ActivityDate | Column::ActivityType => return,
        };
        *slot = value;
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The canonical collection of runs, in file order, together with the
/// columns that were actually present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    records: Vec<ActivityRecord>,
}

impl Dataset {
    /// Build a dataset. Columns are de-duplicated, keeping first occurrence.
    pub fn new(columns: Vec<Column>, records: Vec<ActivityRecord>) -> Self {
        let mut unique: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            if !unique.contains(&column) {
                unique.push(column);
            }
        }
        Self {
            columns: unique,
            records,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// `true` when pace was derived, i.e. the source carried average speed.
    pub fn has_speed_data(&self) -> bool {
        self.has_column(Column::Pace)
    }

    /// `true` when the source carried an average cadence column.
    pub fn has_cadence_data(&self) -> bool {
        self.has_column(Column::AverageCadence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_relevant_headers_round_trip() {
        for column in Column::RELEVANT.iter().chain(Column::DERIVED.iter()) {
            assert_eq!(Column::from_header(column.header()), Some(*column));
        }
    }

    #[test]
    fn test_from_header_unknown() {
        assert_eq!(Column::from_header("moving time"), None);
        // Headers must be normalised before lookup.
        assert_eq!(Column::from_header("Distance"), None);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Average Speed "), "average speed");
        assert_eq!(normalize_header("ACTIVITY ID"), "activity id");
    }

    #[test]
    fn test_numeric_accessors() {
        let mut record = ActivityRecord::new(date(), RUN_KIND);
        record.set_numeric(Column::Distance, Some(10.5));
        record.set_numeric(Column::Pace, Some(5.0));
        record.set_numeric(Column::ActivityId, Some(1.0));

        assert_eq!(record.numeric(Column::Distance), Some(10.5));
        assert_eq!(record.numeric(Column::Pace), Some(5.0));
        assert_eq!(record.activity_id, None);
        assert_eq!(record.numeric(Column::ActivityType), None);
    }

    #[test]
    fn test_dataset_capabilities() {
        let plain = Dataset::new(vec![Column::ActivityDate, Column::Distance], vec![]);
        assert!(!plain.has_speed_data());
        assert!(!plain.has_cadence_data());
        assert!(plain.is_empty());

        let full = Dataset::new(
            vec![
                Column::ActivityDate,
                Column::AverageSpeed,
                Column::AverageCadence,
                Column::AverageKmH,
                Column::Pace,
            ],
            vec![ActivityRecord::new(date(), RUN_KIND)],
        );
        assert!(full.has_speed_data());
        assert!(full.has_cadence_data());
        assert_eq!(full.len(), 1);
    }

    #[test]
    fn test_dataset_dedupes_columns() {
        let ds = Dataset::new(
            vec![Column::Distance, Column::ActivityDate, Column::Distance],
            vec![],
        );
        assert_eq!(ds.columns(), &[Column::Distance, Column::ActivityDate]);
    }
}

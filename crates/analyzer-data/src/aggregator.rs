//! Read-only views over the canonical dataset.
//!
//! Every view takes the dataset by shared reference and builds its own
//! grouping structures; nothing is written back into the dataset.

use std::collections::BTreeMap;

use analyzer_core::models::{ActivityRecord, Dataset};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::metrics::{iso_week, year, year_month};

// ── View types ────────────────────────────────────────────────────────────────

/// Headline numbers for the whole dataset.
///
/// The field names are part of the presentation contract and stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_runs: usize,
    pub total_distance_km: f64,
    pub total_elevation_gain_m: f64,
    /// Single longest run; `None` when no run has a distance.
    pub longest_run_km: Option<f64>,
    /// Mean pace over runs with a pace; `None` when there are none.
    pub average_pace_min_per_km: Option<f64>,
}

/// Pace over time, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceSeries {
    pub dates: Vec<NaiveDateTime>,
    pub pace: Vec<Option<f64>>,
}

/// Distance summed per ISO week number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    pub weeks: Vec<u32>,
    pub distance: Vec<f64>,
}

/// Distance summed per `"YYYY-MM"` month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyVolume {
    pub months: Vec<String>,
    pub volume: Vec<f64>,
}

/// Pace against average heart rate, coloured by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyData {
    pub pace: Vec<f64>,
    pub heart_rate: Vec<f64>,
    pub years: Vec<i32>,
}

/// Pace against cadence, coloured by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadenceData {
    pub pace: Vec<f64>,
    pub cadence: Vec<f64>,
    pub years: Vec<i32>,
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// Stateless helper computing the presentation views.
pub struct ActivityAggregator;

impl ActivityAggregator {
    /// Count, distance and elevation totals plus the longest run.
    pub fn stats(dataset: &Dataset) -> ActivityStats {
        let records = dataset.records();

        let total_distance_km = records.iter().filter_map(|r| r.distance).sum();
        let total_elevation_gain_m = records.iter().filter_map(|r| r.elevation_gain).sum();
        let longest_run_km = records
            .iter()
            .filter_map(|r| r.distance)
            .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))));

        let paces: Vec<f64> = records.iter().filter_map(|r| r.pace).collect();
        let average_pace_min_per_km = if paces.is_empty() {
            None
        } else {
            Some(paces.iter().sum::<f64>() / paces.len() as f64)
        };

        ActivityStats {
            total_runs: records.len(),
            total_distance_km,
            total_elevation_gain_m,
            longest_run_km,
            average_pace_min_per_km,
        }
    }

    /// The first `limit` records in dataset order.
    ///
    /// Dataset order is file order; it is only chronological when the source
    /// export was.
    pub fn latest_activities(dataset: &Dataset, limit: usize) -> Vec<ActivityRecord> {
        dataset.records().iter().take(limit).cloned().collect()
    }

    /// Dates and paces sorted ascending by date (stable for equal dates).
    pub fn pace_series(dataset: &Dataset) -> PaceSeries {
        let mut sorted: Vec<&ActivityRecord> = dataset.records().iter().collect();
        sorted.sort_by_key(|r| r.activity_date);

        PaceSeries {
            dates: sorted.iter().map(|r| r.activity_date).collect(),
            pace: sorted.iter().map(|r| r.pace).collect(),
        }
    }

    /// Distance per ISO week number, ascending by week.
    ///
    /// The key is the week number alone, so week 1 of 2023 and week 1 of
    /// 2024 are summed together.
    pub fn weekly_volume(dataset: &Dataset) -> WeeklyVolume {
        let totals = Self::sum_distance_by(dataset, |r| iso_week(&r.activity_date));
        let (weeks, distance) = totals.into_iter().unzip();
        WeeklyVolume { weeks, distance }
    }

    /// Distance per calendar month, ascending by `"YYYY-MM"` label.
    pub fn monthly_volume(dataset: &Dataset) -> MonthlyVolume {
        let totals = Self::sum_distance_by(dataset, |r| year_month(&r.activity_date));
        let (months, volume) = totals.into_iter().unzip();
        MonthlyVolume { months, volume }
    }

    /// Runs having both a pace and an average heart rate, in dataset order.
    pub fn efficiency(dataset: &Dataset) -> EfficiencyData {
        let mut data = EfficiencyData::default();
        for record in dataset.records() {
            if let (Some(pace), Some(hr)) = (record.pace, record.average_heart_rate) {
                data.pace.push(pace);
                data.heart_rate.push(hr);
                data.years.push(year(&record.activity_date));
            }
        }
        data
    }

    /// Runs with a positive cadence and a positive pace, in dataset order.
    pub fn cadence(dataset: &Dataset) -> CadenceData {
        let mut data = CadenceData::default();
        for record in dataset.records() {
            let cadence = record.average_cadence.unwrap_or(0.0);
            let pace = record.pace.unwrap_or(0.0);
            if cadence > 0.0 && pace > 0.0 {
                data.pace.push(pace);
                data.cadence.push(cadence);
                data.years.push(year(&record.activity_date));
            }
        }
        data
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Sum distances per key; missing distances add nothing but the group is
    /// still reported.
    fn sum_distance_by<K: Ord>(
        dataset: &Dataset,
        key_fn: impl Fn(&ActivityRecord) -> K,
    ) -> BTreeMap<K, f64> {
        let mut map: BTreeMap<K, f64> = BTreeMap::new();
        for record in dataset.records() {
            *map.entry(key_fn(record)).or_insert(0.0) += record.distance.unwrap_or(0.0);
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

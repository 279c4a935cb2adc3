//! Derived per-activity metrics and on-demand grouping keys.
//!
//! Pace is persisted with the canonical dataset. Grouping keys (ISO week,
//! year-month, year) are recomputed by each view and never stored.

use chrono::{Datelike, NaiveDateTime};

/// Factor converting the exported speed unit (m/s) to km/h.
pub const MPS_TO_KMH: f64 = 3.6;

/// Runs at or above this pace (min/km) are treated as non-running noise.
pub const MAX_PLAUSIBLE_PACE: f64 = 7.5;

/// The export counts one foot only.
pub const CADENCE_CORRECTION: f64 = 2.0;

/// Convert an exported speed in m/s to km/h.
pub fn speed_to_km_h(m_per_s: f64) -> f64 {
    m_per_s * MPS_TO_KMH
}

/// Minutes per kilometre at `km_h`; `0.0` when not moving.
pub fn pace_from_km_h(km_h: f64) -> f64 {
    if km_h > 0.0 {
        60.0 / km_h
    } else {
        0.0
    }
}

/// `true` when `0 < pace < 7.5`.
pub fn is_plausible_pace(pace: f64) -> bool {
    pace > 0.0 && pace < MAX_PLAUSIBLE_PACE
}

/// Double a raw single-leg cadence; missing values count as zero.
pub fn correct_cadence(raw: Option<f64>) -> f64 {
    raw.unwrap_or(0.0) * CADENCE_CORRECTION
}

// ── Grouping keys ─────────────────────────────────────────────────────────────

/// ISO-8601 week number (1–53). The year is not part of the key.
pub fn iso_week(date: &NaiveDateTime) -> u32 {
    date.iso_week().week()
}

/// Zero-padded `"YYYY-MM"` label; lexical order is chronological.
pub fn year_month(date: &NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}

pub fn year(date: &NaiveDateTime) -> i32 {
    date.year()
}

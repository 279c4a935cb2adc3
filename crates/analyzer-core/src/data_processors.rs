use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Format used when writing dates to the canonical file.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses activity dates from the formats seen in activity exports.
pub struct DateParser;

impl DateParser {
    /// Parse a date cell into a naive wall-clock timestamp.
    ///
    /// Handles:
    /// * RFC 3339 with `Z` or an explicit offset (the local wall-clock time
    ///   is kept, the offset discarded).
    /// * ISO-8601 date-times with `T` or space separator.
    /// * Date-only `YYYY-MM-DD` (midnight).
    /// * Export style `Nov 4, 2019, 6:04:26 PM`.
    /// * US slash style `MM/DD/YYYY`, with or without `HH:MM:SS`.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%b %d, %Y, %I:%M:%S %p",
            "%b %d, %Y %I:%M:%S %p",
            "%m/%d/%Y %H:%M:%S",
        ];

        for fmt in FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        debug!("DateParser: could not parse date string \"{}\"", s);
        None
    }

    /// Render a timestamp the way the canonical file stores it.
    pub fn format(dt: &NaiveDateTime) -> String {
        dt.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

// ── NumberParser ──────────────────────────────────────────────────────────────

/// Lenient numeric cell parsing shared by the raw and canonical readers.
pub struct NumberParser;

impl NumberParser {
    /// Parse a floating-point cell. Empty and `NaN`-like cells are `None`.
    pub fn parse_f64(s: &str) -> Option<f64> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        s.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parse an integer identifier. Accepts a float spelling with no
    /// fractional part (`"123.0"`).
    pub fn parse_id(s: &str) -> Option<i64> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Some(id);
        }
        Self::parse_f64(s)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    }

    /// `true` when the cell carries no value at all.
    pub fn is_blank(s: &str) -> bool {
        let s = s.trim();
        s.is_empty() || s.eq_ignore_ascii_case("nan")
    }
}

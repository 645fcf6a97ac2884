//! Calendar date utilities
//!
//! Event rows are condensed per day; every chart query takes an inclusive
//! `YYYY-MM-DD` range.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Storage and wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fallback earliest date for a set with no rows
pub fn fallback_earliest() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Get today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", value, e)))
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidInput(format!(
                "start date {} is after end date {}",
                format_date(start),
                format_date(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Both bounds formatted for SQL parameter binding
    pub fn bounds(&self) -> (String, String) {
        (format_date(self.start), format_date(self.end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_iso() {
        assert_eq!(d("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(d(" 2024-03-05 "), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("05/03/2024"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_date(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d("2024-02-01"), d("2024-01-01")).is_err());
    }

    #[test]
    fn test_range_single_day_is_inclusive() {
        let range = DateRange::new(d("2024-01-01"), d("2024-01-01")).unwrap();
        assert!(range.contains(d("2024-01-01")));
        assert!(!range.contains(d("2024-01-02")));
        assert_eq!(range.bounds(), ("2024-01-01".to_string(), "2024-01-01".to_string()));
    }

    #[test]
    fn test_fallback_earliest() {
        assert_eq!(format_date(fallback_earliest()), "2000-01-01");
    }

    #[test]
    fn test_today_is_after_fallback() {
        assert!(today() > fallback_earliest());
    }
}

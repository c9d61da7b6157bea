//! Common types used across the system

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The last `days` calendar days, ending with `today`.
    ///
    /// A window reaching past the earliest representable date starts there.
    /// Zero days gives an empty range.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let back = Duration::days(i64::from(days) - 1);
        Self {
            start: today.checked_sub_signed(back).unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Anything stored on a sheet row with a calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Serde adapter for sheet dates.
///
/// Writes `YYYY-MM-DD`. Reads any of the layouts spreadsheets tend to
/// produce and drops the time of day, so every date coming off a sheet is
/// a plain calendar date.
pub mod sheet_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
    ];

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized date: {raw}")))
    }

    /// Parse a sheet date, stripping any time-of-day component
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                    .map(|dt| dt.date())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_sheet_date_strips_time() {
        assert_eq!(sheet_date::parse("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(sheet_date::parse("2024-01-05 00:00:00"), Some(d(2024, 1, 5)));
        assert_eq!(sheet_date::parse("2024-01-05T13:45:10"), Some(d(2024, 1, 5)));
        assert_eq!(sheet_date::parse("2024/01/05"), Some(d(2024, 1, 5)));
        assert_eq!(sheet_date::parse(" 2024-01-05 "), Some(d(2024, 1, 5)));
    }

    #[test]
    fn test_sheet_date_rejects_garbage() {
        assert_eq!(sheet_date::parse("yesterday"), None);
        assert_eq!(sheet_date::parse("2024-13-01"), None);
    }

    #[test]
    fn test_trailing_range() {
        let range = DateRange::trailing(d(2024, 3, 15), 14);
        assert_eq!(range.start, d(2024, 3, 2));
        assert!(range.contains(d(2024, 3, 2)));
        assert!(range.contains(d(2024, 3, 15)));
        assert!(!range.contains(d(2024, 3, 1)));
        assert!(!range.contains(d(2024, 3, 16)));
    }

    #[test]
    fn test_trailing_range_edges() {
        let today = d(2024, 1, 1);
        let single = DateRange::trailing(today, 1);
        assert_eq!((single.start, single.end), (today, today));

        let empty = DateRange::trailing(today, 0);
        assert!(!empty.contains(today));

        let everything = DateRange::trailing(today, u32::MAX);
        assert_eq!(everything.start, NaiveDate::MIN);
        assert!(everything.contains(d(1900, 1, 1)));
    }
}

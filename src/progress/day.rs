//! Day-key utilities.
//!
//! All per-day state is keyed by "YYYY-MM-DD" strings in the database;
//! `NaiveDate` is the in-memory form. The local timezone is applied only at
//! the CLI edge, never inside the engine.

use chrono::{Datelike, Local, NaiveDate};

/// Format a date as its day key ("YYYY-MM-DD")
pub fn day_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a day key back into a date
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Weekday index with 0 = Sunday .. 6 = Saturday
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(day_key(date), "2025-06-01");
    }

    #[test]
    fn test_parse_day_key_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 28).unwrap();
        assert_eq!(parse_day_key(&day_key(date)), Some(date));
        assert_eq!(parse_day_key("not-a-date"), None);
        assert_eq!(parse_day_key("2025-13-40"), None);
    }

    #[test]
    fn test_weekday_index_sunday_based() {
        // 2025-06-01 was a Sunday
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        // 2025-06-02 was a Monday
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(weekday_index(monday), 1);
        // 2025-06-07 was a Saturday
        let saturday = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        assert_eq!(weekday_index(saturday), 6);
    }
}

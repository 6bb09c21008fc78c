//! Time helpers for business timezone conversions
//!
//! Calendar dates and clock times are civil values (`NaiveDate`, `NaiveTime`)
//! compared in the configured business timezone; they are never shifted
//! through UTC. Timestamps are `i64` Unix millis.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Current instant as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current wall-clock date/time in the business timezone
pub fn now_local(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

/// Canonical `YYYY-MM-DD` rendering of a civil date
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Canonical zero-padded `HH:MM` rendering of a clock time
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date), "2026-03-07");
    }

    #[test]
    fn test_format_time_is_zero_padded() {
        let time = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_time(time), "09:05");
    }
}

//! Availability Calculator
//!
//! Pure slot-grid and table-availability math. The ±30 minute margin models
//! table turnover time, so conflict detection is an interval-overlap test
//! against `[time - margin, time + margin]`, never slot equality.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// First bookable hour (11:00)
pub const OPENING_HOUR: u32 = 11;
/// Last bookable hour (18:00 exactly; 18:30 is past closing)
pub const CLOSING_HOUR: u32 = 18;
/// Hard cap of guests per reservation
pub const MAX_PEOPLE_PER_RESERVATION: i32 = 30;
/// Turnover margin around a reservation, in minutes
pub const CONFLICT_MARGIN_MINUTES: i64 = 30;

/// Bookable half-hour marks for `date`, as zero-padded `HH:MM` strings.
///
/// When `date` is the current local date, slots not strictly in the future
/// are dropped. The caller is responsible for rejecting past dates.
pub fn slot_grid(date: NaiveDate, now_local: NaiveDateTime) -> Vec<String> {
    let is_today = date == now_local.date();
    let mut hours = Vec::new();

    for hour in OPENING_HOUR..=CLOSING_HOUR {
        for minute in [0u32, 30] {
            if hour == CLOSING_HOUR && minute == 30 {
                continue;
            }
            let slot = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
            if is_today && date.and_time(slot) <= now_local {
                continue;
            }
            hours.push(format!("{hour:02}:{minute:02}"));
        }
    }

    hours
}

/// Inclusive `[time - margin, time + margin]` window as `HH:MM` strings,
/// clamped to the same civil day
pub fn conflict_window(time: NaiveTime) -> (String, String) {
    let minute_of_day = (time.hour() * 60 + time.minute()) as i64;
    let start = (minute_of_day - CONFLICT_MARGIN_MINUTES).max(0);
    let end = (minute_of_day + CONFLICT_MARGIN_MINUTES).min(23 * 60 + 59);
    (format_minute_of_day(start), format_minute_of_day(end))
}

fn format_minute_of_day(minutes: i64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Candidate tables minus the occupied ones, preserving candidate order
pub fn free_tables(candidates: &[i32], occupied: &[i32]) -> Vec<i32> {
    candidates
        .iter()
        .copied()
        .filter(|table| !occupied.contains(table))
        .collect()
}

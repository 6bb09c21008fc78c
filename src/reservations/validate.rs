//! Reservation Validator
//!
//! Business rules gating every create/update, in order: future date,
//! business-hour grid, capacity, table conflict. All checks run before any
//! write; user-facing messages are in Spanish like the rest of the site.
//!
//! Dates are civil `(year, month, day)` values compared against today's
//! date in the business timezone, never shifted through UTC instants.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

use super::availability::{CLOSING_HOUR, MAX_PEOPLE_PER_RESERVATION, OPENING_HOUR};
use crate::utils::AppError;

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Formato de fecha inválido: {0} (se espera YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("No se pueden hacer reservas en fechas pasadas")]
    PastDate,

    #[error(
        "No se pueden hacer reservas para horas pasadas. Por favor selecciona una hora futura."
    )]
    PastTime,

    #[error("{0}")]
    InvalidTimeSlot(String),

    #[error("La capacidad máxima por reserva es de {MAX_PEOPLE_PER_RESERVATION} personas")]
    CapacityExceeded,

    #[error(
        "La mesa {table} ya está reservada a las {time}. Por favor selecciona otra hora o mesa."
    )]
    TableConflictExact { table: i32, time: String },

    #[error(
        "La mesa {table} ya está reservada cerca de las {time} (±30 min). Por favor selecciona otra hora o mesa."
    )]
    TableConflictNearby { table: i32, time: String },
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::TableConflictExact { .. }
            | ReservationError::TableConflictNearby { .. } => AppError::Conflict(err.to_string()),
            _ => AppError::Validation(err.to_string()),
        }
    }
}

/// Parse a `YYYY-MM-DD` civil date, with no timezone arithmetic
pub fn parse_civil_date(raw: &str) -> Result<NaiveDate, ReservationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReservationError::InvalidDate(raw.to_string()))
}

/// Parse an `HH:MM` clock time
pub fn parse_clock_time(raw: &str) -> Result<NaiveTime, ReservationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
        ReservationError::InvalidTimeSlot(format!(
            "Formato de hora inválido: {raw} (se espera HH:MM)"
        ))
    })
}

/// Rule 1: the reservation date must be today or later
pub fn validate_future_date(date: NaiveDate, today: NaiveDate) -> Result<(), ReservationError> {
    if date < today {
        return Err(ReservationError::PastDate);
    }
    Ok(())
}

/// Rule 2: the time must sit on the half-hour grid inside business hours,
/// and be strictly in the future when the date is today
pub fn validate_business_hours(
    time: NaiveTime,
    date: NaiveDate,
    now_local: NaiveDateTime,
) -> Result<(), ReservationError> {
    let (hour, minute) = (time.hour(), time.minute());

    if hour < OPENING_HOUR || hour > CLOSING_HOUR {
        return Err(ReservationError::InvalidTimeSlot(format!(
            "Solo se pueden realizar reservas entre las {OPENING_HOUR}:00 y {CLOSING_HOUR}:00"
        )));
    }

    // 18:00 is the last slot; 18:30 is past closing
    if hour == CLOSING_HOUR && minute > 0 {
        return Err(ReservationError::InvalidTimeSlot(format!(
            "La última reserva disponible es a las {CLOSING_HOUR}:00"
        )));
    }

    if minute != 0 && minute != 30 {
        return Err(ReservationError::InvalidTimeSlot(
            "Las reservas deben ser en intervalos de media hora (ej: 12:00, 12:30)".to_string(),
        ));
    }

    if date == now_local.date() && date.and_time(time) <= now_local {
        return Err(ReservationError::PastTime);
    }

    Ok(())
}

/// Rule 3: guests per reservation capped at [`MAX_PEOPLE_PER_RESERVATION`]
pub fn validate_people_count(people_count: i32) -> Result<(), ReservationError> {
    if people_count > MAX_PEOPLE_PER_RESERVATION {
        return Err(ReservationError::CapacityExceeded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_past_date_rejected() {
        let err = validate_future_date(date("2030-05-09"), date("2030-05-10")).unwrap_err();
        assert!(matches!(err, ReservationError::PastDate));
    }

    #[test]
    fn test_today_and_future_accepted() {
        assert!(validate_future_date(date("2030-05-10"), date("2030-05-10")).is_ok());
        assert!(validate_future_date(date("2031-01-01"), date("2030-05-10")).is_ok());
    }

    #[test]
    fn test_malformed_date_rejected() {
        assert!(matches!(
            parse_civil_date("10/05/2030"),
            Err(ReservationError::InvalidDate(_))
        ));
        assert!(parse_civil_date("2030-05-10").is_ok());
    }

    #[test]
    fn test_outside_business_hours_rejected() {
        let now = at("2030-05-09T12:00:00");
        let tomorrow = date("2030-05-10");
        assert!(validate_business_hours(time(10, 30), tomorrow, now).is_err());
        assert!(validate_business_hours(time(19, 0), tomorrow, now).is_err());
        assert!(validate_business_hours(time(11, 0), tomorrow, now).is_ok());
        assert!(validate_business_hours(time(18, 0), tomorrow, now).is_ok());
    }

    #[test]
    fn test_half_past_closing_always_rejected() {
        let err = validate_business_hours(time(18, 30), date("2030-05-10"), at("2030-05-09T12:00:00"))
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidTimeSlot(_)));
    }

    #[test]
    fn test_off_grid_minutes_rejected() {
        let now = at("2030-05-09T12:00:00");
        let tomorrow = date("2030-05-10");
        for minute in [1, 15, 29, 31, 45, 59] {
            assert!(
                validate_business_hours(time(12, minute), tomorrow, now).is_err(),
                "12:{minute:02} should be rejected"
            );
        }
    }

    #[test]
    fn test_today_past_time_rejected() {
        let now = at("2030-05-10T13:15:00");
        let today = date("2030-05-10");
        let err = validate_business_hours(time(13, 0), today, now).unwrap_err();
        assert!(matches!(err, ReservationError::PastTime));
        // exactly "now" is not strictly in the future either
        let now_on_grid = at("2030-05-10T13:00:00");
        assert!(validate_business_hours(time(13, 0), today, now_on_grid).is_err());
        assert!(validate_business_hours(time(13, 30), today, now).is_ok());
    }

    #[test]
    fn test_capacity() {
        assert!(validate_people_count(30).is_ok());
        assert!(matches!(
            validate_people_count(31),
            Err(ReservationError::CapacityExceeded)
        ));
    }

    #[test]
    fn test_conflict_errors_map_to_409() {
        let err: AppError = ReservationError::TableConflictExact {
            table: 3,
            time: "12:00".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = ReservationError::PastDate.into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

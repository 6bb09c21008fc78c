//! Restaurant Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// Restaurant reservation entity
///
/// `date` and `time` are civil values stored verbatim as `YYYY-MM-DD` /
/// `HH:MM` strings so they are never reinterpreted through a timezone
/// on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub date: String,
    pub time: String,
    pub people_count: i32,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub table_number: Option<i32>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub confirmed_by: Option<i64>,
    /// Unix millis, set once at creation
    pub created_at: i64,
}

impl Reservation {
    /// Id rendered as "reservation:key", empty string before persistence
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Bare record key (the part after the colon)
    pub fn id_key(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.key().to_string())
            .unwrap_or_default()
    }
}

/// Create reservation payload (public endpoint)
///
/// The capacity *maximum* is intentionally not enforced here: the
/// reservation validator owns that rule and reports it as a capacity
/// error with its own message.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationCreate {
    #[validate(length(min = 3, max = 100, message = "El nombre debe tener entre 3 y 100 caracteres"))]
    pub customer_name: String,
    #[validate(length(min = 8, max = 20, message = "El teléfono debe tener entre 8 y 20 caracteres"))]
    pub phone: Option<String>,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
    pub date: String,
    pub time: String,
    #[validate(range(min = 1, message = "Debe haber al menos 1 persona"))]
    pub people_count: i32,
    #[validate(length(max = 500, message = "Las notas no pueden exceder 500 caracteres"))]
    pub note: Option<String>,
    pub zone: Option<String>,
    pub table_number: Option<i32>,
}

/// Partial update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReservationUpdate {
    #[validate(length(min = 3, max = 100, message = "El nombre debe tener entre 3 y 100 caracteres"))]
    pub customer_name: Option<String>,
    #[validate(length(min = 8, max = 20, message = "El teléfono debe tener entre 8 y 20 caracteres"))]
    pub phone: Option<String>,
    #[validate(email(message = "El correo electrónico no es válido"))]
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub people_count: Option<i32>,
    #[validate(length(max = 500, message = "Las notas no pueden exceder 500 caracteres"))]
    pub note: Option<String>,
    pub zone: Option<String>,
    pub table_number: Option<i32>,
}

/// Status change payload (staff panel)
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationStatusChange {
    pub status: ReservationStatus,
    #[serde(default)]
    pub confirmed_by: Option<i64>,
}

//! Notification Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Delivery shape of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Email,
    Push,
    System,
}

/// Read-state of a persisted notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    New,
    Read,
}

/// Persisted notification row
///
/// The customer email address a request may carry (`to_email`) is
/// transient and never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub category: String,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub restaurant_reservation_id: Option<RecordId>,
    /// Unix millis
    pub created_at: i64,
}

impl Notification {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Parse a reservation linkage id from either "reservation:key" or a bare key
pub fn reservation_link(raw: &str) -> RecordId {
    raw.parse::<RecordId>()
        .unwrap_or_else(|_| RecordId::from_table_key("reservation", raw))
}

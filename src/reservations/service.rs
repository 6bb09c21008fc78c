//! Reservation Service
//!
//! Orchestrates the validation pipeline, the availability calculator and
//! the repository, and emits notifications for lifecycle events. All
//! validation runs before any write. Notification delivery is best-effort:
//! a failed dispatch is logged and never fails the reservation operation.

use std::sync::Arc;

use chrono::NaiveTime;
use chrono_tz::Tz;
use tracing::{info, warn};

use super::availability::{conflict_window, free_tables, slot_grid};
use super::validate::{
    ReservationError, parse_civil_date, parse_clock_time, validate_business_hours,
    validate_future_date, validate_people_count,
};
use super::zones::tables_for_zone;
use crate::db::models::{
    NotificationKind, Reservation, ReservationCreate, ReservationStatus, ReservationStatusChange,
    ReservationUpdate,
};
use crate::db::repository::ReservationRepository;
use crate::notify::{CATEGORY_RESERVATION, NotificationDispatcher, NotificationRequest};
use crate::utils::time::{format_date, format_time, now_local, now_millis};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ReservationService {
    repo: ReservationRepository,
    notifier: Option<Arc<NotificationDispatcher>>,
    tz: Tz,
    admin_base_url: String,
}

impl ReservationService {
    pub fn new(
        repo: ReservationRepository,
        notifier: Option<Arc<NotificationDispatcher>>,
        tz: Tz,
        admin_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            notifier,
            tz,
            admin_base_url: admin_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Bookable `HH:MM` slots for a date; past dates yield a validation error
    pub async fn available_hours(&self, date_raw: &str) -> AppResult<Vec<String>> {
        let date = parse_civil_date(date_raw)?;
        let now = now_local(self.tz);
        validate_future_date(date, now.date())?;
        Ok(slot_grid(date, now))
    }

    /// Free table numbers for a date/time, optionally narrowed to a zone
    pub async fn available_tables(
        &self,
        date_raw: &str,
        time_raw: &str,
        zone: Option<&str>,
    ) -> AppResult<Vec<i32>> {
        let date = parse_civil_date(date_raw)?;
        let time = parse_clock_time(time_raw)?;
        let now = now_local(self.tz);
        validate_future_date(date, now.date())?;
        validate_business_hours(time, date, now)?;

        let (start, end) = conflict_window(time);
        let occupied = self
            .repo
            .occupied_tables(&format_date(date), &start, &end)
            .await?;
        let candidates = tables_for_zone(zone);
        Ok(free_tables(&candidates, &occupied))
    }

    pub async fn create(&self, payload: ReservationCreate) -> AppResult<Reservation> {
        let date = parse_civil_date(&payload.date)?;
        let time = parse_clock_time(&payload.time)?;
        let now = now_local(self.tz);

        validate_future_date(date, now.date())?;
        validate_business_hours(time, date, now)?;
        validate_people_count(payload.people_count)?;
        if let Some(table) = payload.table_number {
            self.check_table_conflict(&format_date(date), time, table, None)
                .await?;
        }

        let row = Reservation {
            id: None,
            customer_name: payload.customer_name.trim().to_string(),
            phone: payload.phone,
            email: payload.email.map(|e| e.trim().to_lowercase()),
            date: format_date(date),
            time: format_time(time),
            people_count: payload.people_count,
            note: payload.note,
            zone: payload.zone,
            table_number: payload.table_number,
            status: ReservationStatus::Pending,
            confirmed_by: None,
            created_at: now_millis(),
        };

        let saved = self.repo.create(row).await?;
        info!(id = %saved.id_string(), date = %saved.date, time = %saved.time, "reservation created");

        self.notify_created(&saved).await;
        Ok(saved)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_one(&self, id: &str) -> AppResult<Reservation> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))
    }

    /// Partial update; rule fields that change are re-validated, and the
    /// conflict check excludes the reservation itself
    pub async fn update(&self, id: &str, payload: ReservationUpdate) -> AppResult<Reservation> {
        let mut current = self.find_one(id).await?;

        let rules_touched =
            payload.date.is_some() || payload.time.is_some() || payload.table_number.is_some();

        if let Some(name) = payload.customer_name {
            current.customer_name = name.trim().to_string();
        }
        if let Some(phone) = payload.phone {
            current.phone = Some(phone);
        }
        if let Some(email) = payload.email {
            current.email = Some(email.trim().to_lowercase());
        }
        if let Some(date_raw) = &payload.date {
            current.date = format_date(parse_civil_date(date_raw)?);
        }
        if let Some(time_raw) = &payload.time {
            current.time = format_time(parse_clock_time(time_raw)?);
        }
        if let Some(people) = payload.people_count {
            validate_people_count(people)?;
            current.people_count = people;
        }
        if let Some(note) = payload.note {
            current.note = Some(note);
        }
        if let Some(zone) = payload.zone {
            current.zone = Some(zone);
        }
        if let Some(table) = payload.table_number {
            current.table_number = Some(table);
        }

        if rules_touched {
            let date = parse_civil_date(&current.date)?;
            let time = parse_clock_time(&current.time)?;
            let now = now_local(self.tz);
            validate_future_date(date, now.date())?;
            validate_business_hours(time, date, now)?;
            if let Some(table) = current.table_number {
                self.check_table_conflict(&current.date, time, table, id)
                    .await?;
            }
        }

        let updated = self.repo.update(id, current).await?;
        info!(id = %updated.id_string(), "reservation updated");
        Ok(updated)
    }

    /// Status transition from the staff panel; every transition emails the
    /// customer when an address is on file
    pub async fn update_status(
        &self,
        id: &str,
        change: ReservationStatusChange,
    ) -> AppResult<Reservation> {
        let mut current = self.find_one(id).await?;
        current.status = change.status;
        if change.confirmed_by.is_some() {
            current.confirmed_by = change.confirmed_by;
        }

        let updated = self.repo.update(id, current).await?;
        info!(id = %updated.id_string(), status = updated.status.as_str(), "reservation status changed");

        self.notify_status_changed(&updated).await;
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Reserva no encontrada".to_string()));
        }
        info!(id, "reservation deleted");
        Ok(())
    }

    /// Interval-overlap conflict check for a table; exact-time collisions get
    /// their own message
    async fn check_table_conflict(
        &self,
        date: &str,
        time: NaiveTime,
        table: i32,
        exclude_id: impl Into<Option<&str>>,
    ) -> AppResult<()> {
        let exclude = exclude_id
            .into()
            .map(|id| id.parse().unwrap_or_else(|_| {
                surrealdb::RecordId::from_table_key("reservation", id)
            }));

        let (start, end) = conflict_window(time);
        let conflicts = self
            .repo
            .find_conflicts(date, &start, &end, table, exclude.as_ref())
            .await?;

        if conflicts.is_empty() {
            return Ok(());
        }

        let time_str = format_time(time);
        let err = if conflicts.iter().any(|c| c.time == time_str) {
            ReservationError::TableConflictExact {
                table,
                time: time_str,
            }
        } else {
            ReservationError::TableConflictNearby {
                table,
                time: time_str,
            }
        };
        Err(err.into())
    }

    async fn notify_created(&self, saved: &Reservation) {
        let mut message = format!(
            "Reserva de {} para {} personas el {} a las {}",
            saved.customer_name, saved.people_count, saved.date, saved.time
        );
        if let Some(table) = saved.table_number {
            message.push_str(&format!(" (mesa {table})"));
        }
        if let Some(zone) = &saved.zone {
            message.push_str(&format!(" en {zone}"));
        }

        self.dispatch(NotificationRequest {
            category: CATEGORY_RESERVATION.to_string(),
            title: "Nueva reserva de restaurante".to_string(),
            message,
            kind: NotificationKind::Push,
            to_email: saved.email.clone(),
            reservation_url: Some(self.reservation_url(saved)),
            restaurant_reservation_id: Some(saved.id_string()),
            user_id: None,
        })
        .await;
    }

    async fn notify_status_changed(&self, updated: &Reservation) {
        let Some(email) = &updated.email else {
            return;
        };

        // one customer email per transition; anything other than confirmed
        // reads as a cancellation
        let confirmed = updated.status == ReservationStatus::Confirmed;
        let (title, verb) = if confirmed {
            ("Reserva confirmada", "confirmada")
        } else {
            ("Reserva cancelada", "cancelada")
        };

        self.dispatch(NotificationRequest {
            category: CATEGORY_RESERVATION.to_string(),
            title: title.to_string(),
            message: format!("La reserva de {} fue {verb}.", updated.customer_name),
            kind: NotificationKind::Email,
            to_email: Some(email.clone()),
            reservation_url: Some(self.reservation_url(updated)),
            restaurant_reservation_id: Some(updated.id_string()),
            user_id: None,
        })
        .await;
    }

    async fn dispatch(&self, req: NotificationRequest) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let outcome = notifier.dispatch(req).await;
        if !outcome.is_delivered() {
            warn!(?outcome, "reservation notification not delivered");
        }
    }

    fn reservation_url(&self, reservation: &Reservation) -> String {
        format!("{}/reservas/{}", self.admin_base_url, reservation.id_key())
    }
}

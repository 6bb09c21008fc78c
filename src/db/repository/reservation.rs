//! Restaurant Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Reservation;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All reservations, newest date first, earliest time first within a date
    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let rows: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY date DESC, time ASC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = parse_id(id);
        let row: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(row)
    }

    pub async fn create(&self, data: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Replace the stored row with `data` (id taken from the path, not the body)
    pub async fn update(&self, id: &str, mut data: Reservation) -> RepoResult<Reservation> {
        let thing = parse_id(id);
        data.id = None;
        let updated: Option<Reservation> = self.base.db().update(thing).content(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(id);
        let deleted: Option<Reservation> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    /// Non-cancelled reservations holding `table_number` on `date` with a time
    /// inside `[start, end]` (inclusive), optionally excluding one reservation.
    ///
    /// Times are zero-padded `HH:MM` strings, so lexicographic comparison is
    /// chronological comparison.
    pub async fn find_conflicts(
        &self,
        date: &str,
        start: &str,
        end: &str,
        table_number: i32,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Vec<Reservation>> {
        let mut sql = String::from(
            "SELECT * FROM reservation \
             WHERE date = $date AND status != 'cancelled' \
             AND table_number = $table \
             AND time >= $start AND time <= $end",
        );
        if exclude.is_some() {
            sql.push_str(" AND id != $exclude");
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("date", date.to_string()))
            .bind(("table", table_number))
            .bind(("start", start.to_string()))
            .bind(("end", end.to_string()));
        if let Some(id) = exclude {
            query = query.bind(("exclude", id.clone()));
        }

        let rows: Vec<Reservation> = query.await?.take(0)?;
        Ok(rows)
    }

    /// Table numbers held by any non-cancelled reservation on `date` within
    /// `[start, end]` (inclusive)
    pub async fn occupied_tables(
        &self,
        date: &str,
        start: &str,
        end: &str,
    ) -> RepoResult<Vec<i32>> {
        let rows: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE date = $date AND status != 'cancelled' \
                 AND time >= $start AND time <= $end",
            )
            .bind(("date", date.to_string()))
            .bind(("start", start.to_string()))
            .bind(("end", end.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().filter_map(|r| r.table_number).collect())
    }
}

/// Accepts both "reservation:key" and a bare key
fn parse_id(id: &str) -> RecordId {
    id.parse()
        .unwrap_or_else(|_| RecordId::from_table_key(TABLE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ReservationStatus;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    fn reservation(date: &str, time: &str, table: Option<i32>) -> Reservation {
        Reservation {
            id: None,
            customer_name: "Ana Mora".to_string(),
            phone: None,
            email: None,
            date: date.to_string(),
            time: time.to_string(),
            people_count: 4,
            note: None,
            zone: None,
            table_number: table,
            status: ReservationStatus::Pending,
            confirmed_by: None,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_conflict_inside_margin_is_found() {
        let repo = ReservationRepository::new(test_db().await);
        repo.create(reservation("2030-05-10", "12:00", Some(3)))
            .await
            .unwrap();

        let conflicts = repo
            .find_conflicts("2030-05-10", "11:45", "12:45", 3, None)
            .await
            .unwrap();
        assert_eq!(conflicts.len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_on_other_table_or_date_is_ignored() {
        let repo = ReservationRepository::new(test_db().await);
        repo.create(reservation("2030-05-10", "12:00", Some(3)))
            .await
            .unwrap();

        let other_table = repo
            .find_conflicts("2030-05-10", "11:45", "12:45", 4, None)
            .await
            .unwrap();
        assert!(other_table.is_empty());

        let other_date = repo
            .find_conflicts("2030-05-11", "11:45", "12:45", 3, None)
            .await
            .unwrap();
        assert!(other_date.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_reservations_do_not_conflict() {
        let repo = ReservationRepository::new(test_db().await);
        let mut row = reservation("2030-05-10", "12:00", Some(3));
        row.status = ReservationStatus::Cancelled;
        repo.create(row).await.unwrap();

        let conflicts = repo
            .find_conflicts("2030-05-10", "11:30", "12:30", 3, None)
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_exclude_self_on_update() {
        let repo = ReservationRepository::new(test_db().await);
        let saved = repo
            .create(reservation("2030-05-10", "12:00", Some(3)))
            .await
            .unwrap();

        let conflicts = repo
            .find_conflicts("2030-05-10", "11:30", "12:30", 3, saved.id.as_ref())
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_occupied_tables_in_window() {
        let repo = ReservationRepository::new(test_db().await);
        repo.create(reservation("2030-05-10", "12:00", Some(3)))
            .await
            .unwrap();
        repo.create(reservation("2030-05-10", "12:30", Some(7)))
            .await
            .unwrap();
        repo.create(reservation("2030-05-10", "15:00", Some(9)))
            .await
            .unwrap();

        let mut occupied = repo
            .occupied_tables("2030-05-10", "11:30", "12:30")
            .await
            .unwrap();
        occupied.sort();
        assert_eq!(occupied, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_find_all_orders_date_desc_time_asc() {
        let repo = ReservationRepository::new(test_db().await);
        repo.create(reservation("2030-05-10", "13:00", None))
            .await
            .unwrap();
        repo.create(reservation("2030-05-11", "11:00", None))
            .await
            .unwrap();
        repo.create(reservation("2030-05-10", "11:30", None))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        let keys: Vec<(String, String)> =
            all.into_iter().map(|r| (r.date, r.time)).collect();
        assert_eq!(
            keys,
            vec![
                ("2030-05-11".to_string(), "11:00".to_string()),
                ("2030-05-10".to_string(), "11:30".to_string()),
                ("2030-05-10".to_string(), "13:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = ReservationRepository::new(test_db().await);
        let saved = repo
            .create(reservation("2030-05-10", "12:00", Some(3)))
            .await
            .unwrap();

        let mut changed = saved.clone();
        changed.time = "13:00".to_string();
        changed.status = ReservationStatus::Confirmed;
        let updated = repo.update(&saved.id_string(), changed).await.unwrap();

        assert_eq!(updated.time, "13:00");
        assert_eq!(updated.status, ReservationStatus::Confirmed);
        assert_eq!(updated.id, saved.id);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = ReservationRepository::new(test_db().await);
        assert!(!repo.delete("reservation:missing").await.unwrap());
    }
}

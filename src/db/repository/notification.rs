//! Notification Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Notification, NotificationStatus};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, data: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// All notifications, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Notification>> {
        let rows: Vec<Notification> = self
            .base
            .db()
            .query("SELECT * FROM notification ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn find_by_category(&self, category: &str) -> RepoResult<Vec<Notification>> {
        let rows: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE category = $category \
                 ORDER BY created_at DESC",
            )
            .bind(("category", category.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Mark a notification as read; `None` when the id does not exist
    pub async fn mark_read(&self, id: &str) -> RepoResult<Option<Notification>> {
        let thing = parse_id(id);
        let existing: Option<Notification> = self.base.db().select(thing.clone()).await?;
        let Some(mut row) = existing else {
            return Ok(None);
        };
        row.status = NotificationStatus::Read;
        row.id = None;
        let updated: Option<Notification> = self.base.db().update(thing).content(row).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(id);
        let deleted: Option<Notification> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    /// Legacy lookup: resolve a user's email and display name by id
    pub async fn find_user_email(&self, user_id: &str) -> RepoResult<Option<(String, String)>> {
        #[derive(Debug, Deserialize)]
        struct UserRow {
            email: Option<String>,
            first_name: Option<String>,
            last_name: Option<String>,
        }

        let thing: RecordId = user_id
            .parse()
            .unwrap_or_else(|_| RecordId::from_table_key("user", user_id));
        let rows: Vec<UserRow> = self
            .base
            .db()
            .query("SELECT email, first_name, last_name FROM user WHERE id = $id")
            .bind(("id", thing))
            .await?
            .take(0)?;

        Ok(rows.into_iter().next().and_then(|u| {
            let email = u.email?;
            let name = format!(
                "{} {}",
                u.first_name.unwrap_or_default(),
                u.last_name.unwrap_or_default()
            )
            .trim()
            .to_string();
            Some((email, name))
        }))
    }
}

/// Accepts both "notification:key" and a bare key
fn parse_id(id: &str) -> RecordId {
    id.parse()
        .unwrap_or_else(|_| RecordId::from_table_key(TABLE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NotificationKind;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    fn notification(category: &str, title: &str, created_at: i64) -> Notification {
        Notification {
            id: None,
            category: category.to_string(),
            title: title.to_string(),
            message: "mensaje".to_string(),
            status: NotificationStatus::New,
            kind: NotificationKind::Push,
            user_id: None,
            restaurant_reservation_id: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let repo = NotificationRepository::new(test_db().await);
        repo.create(notification("RESERVATION", "primera", 100))
            .await
            .unwrap();
        repo.create(notification("CONTACT", "segunda", 200))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "segunda");
    }

    #[tokio::test]
    async fn test_find_by_category() {
        let repo = NotificationRepository::new(test_db().await);
        repo.create(notification("RESERVATION", "reserva", 100))
            .await
            .unwrap();
        repo.create(notification("CONTACT", "contacto", 200))
            .await
            .unwrap();

        let rows = repo.find_by_category("RESERVATION").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "reserva");
    }

    #[tokio::test]
    async fn test_mark_read() {
        let repo = NotificationRepository::new(test_db().await);
        let saved = repo
            .create(notification("RESERVATION", "reserva", 100))
            .await
            .unwrap();

        let updated = repo.mark_read(&saved.id_string()).await.unwrap().unwrap();
        assert_eq!(updated.status, NotificationStatus::Read);

        assert!(repo.mark_read("notification:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = NotificationRepository::new(test_db().await);
        let saved = repo
            .create(notification("RESERVATION", "reserva", 100))
            .await
            .unwrap();

        assert!(repo.delete(&saved.id_string()).await.unwrap());
        assert!(!repo.delete(&saved.id_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_user_email_missing_user() {
        let repo = NotificationRepository::new(test_db().await);
        let found = repo.find_user_email("user:nadie").await.unwrap();
        assert!(found.is_none());
    }
}

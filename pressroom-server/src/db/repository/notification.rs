//! Notification Repository

use super::{BaseRepository, RepoResult, parse_record_id};
use crate::db::models::Notification;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

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

    /// Fan-out write, one row per recipient. Partial failure aborts the batch;
    /// the caller treats notification delivery as best-effort anyway.
    pub async fn create_many(&self, notifications: Vec<Notification>) -> RepoResult<usize> {
        let mut written = 0;
        for n in notifications {
            let created: Option<Notification> = self.base.db().create(TABLE).content(n).await?;
            if created.is_some() {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Newest first for one recipient
    pub async fn find_by_recipient(&self, recipient_id: &str) -> RepoResult<Vec<Notification>> {
        let rid = recipient_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM notification WHERE recipient_id = $rid ORDER BY created_at DESC LIMIT 200")
            .bind(("rid", rid))
            .await?;
        let rows: Vec<Notification> = result.take(0)?;
        Ok(rows)
    }

    pub async fn unread_count(&self, recipient_id: &str) -> RepoResult<usize> {
        let rid = recipient_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM notification WHERE recipient_id = $rid AND is_read = false")
            .bind(("rid", rid))
            .await?;
        let rows: Vec<Notification> = result.take(0)?;
        Ok(rows.len())
    }

    /// Mark one row read. Scoped to the recipient so nobody can touch
    /// another user's feed by guessing ids.
    pub async fn mark_read(
        &self,
        id: &str,
        recipient_id: &str,
    ) -> RepoResult<Option<Notification>> {
        let thing = parse_record_id(id)?;
        let existing: Option<Notification> = self.base.db().select(thing.clone()).await?;
        let Some(mut row) = existing else {
            return Ok(None);
        };
        if row.recipient_id != recipient_id {
            return Ok(None);
        }
        row.is_read = true;
        // Strip the id; SurrealDB rejects a content document whose id field
        // names the record a specific update already targets.
        row.id = None;
        let updated: Option<Notification> = self.base.db().update(thing).content(row).await?;
        Ok(updated)
    }

    pub async fn mark_all_read(&self, recipient_id: &str) -> RepoResult<()> {
        let rid = recipient_id.to_string();
        self.base
            .db()
            .query("UPDATE notification SET is_read = true WHERE recipient_id = $rid AND is_read = false")
            .bind(("rid", rid))
            .await?;
        Ok(())
    }
}

//! Timeline Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::TimelineEntry;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "timeline";

#[derive(Clone)]
pub struct TimelineRepository {
    base: BaseRepository,
}

impl TimelineRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append an entry. Rows are never updated afterwards.
    pub async fn append(&self, entry: TimelineEntry) -> RepoResult<TimelineEntry> {
        let created: Option<TimelineEntry> = self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to append timeline entry".to_string()))
    }

    /// Full history of one order, oldest first
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<TimelineEntry>> {
        let oid = parse_record_id(order_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM timeline WHERE order_id = $oid ORDER BY created_at ASC")
            .bind(("oid", oid))
            .await?;
        let entries: Vec<TimelineEntry> = result.take(0)?;
        Ok(entries)
    }

    /// History of one item, oldest first
    pub async fn find_by_item(&self, item_id: &str) -> RepoResult<Vec<TimelineEntry>> {
        let iid = parse_record_id(item_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM timeline WHERE item_id = $iid ORDER BY created_at ASC")
            .bind(("iid", iid))
            .await?;
        let entries: Vec<TimelineEntry> = result.take(0)?;
        Ok(entries)
    }
}

//! Activity Log Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ActivityLog;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "activity_log";

#[derive(Clone)]
pub struct ActivityLogRepository {
    base: BaseRepository,
}

impl ActivityLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn append(&self, entry: ActivityLog) -> RepoResult<ActivityLog> {
        let created: Option<ActivityLog> = self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to append activity log".to_string()))
    }

    /// Recent entries, newest first
    pub async fn find_recent(&self, limit: usize) -> RepoResult<Vec<ActivityLog>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM activity_log ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?;
        let rows: Vec<ActivityLog> = result.take(0)?;
        Ok(rows)
    }
}

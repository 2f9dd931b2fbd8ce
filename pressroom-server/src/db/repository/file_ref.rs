//! FileRef Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::FileRef;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "file_ref";

#[derive(Clone)]
pub struct FileRefRepository {
    base: BaseRepository,
}

impl FileRefRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, file: FileRef) -> RepoResult<FileRef> {
        let created: Option<FileRef> = self.base.db().create(TABLE).content(file).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create file ref".to_string()))
    }

    /// Full-row replace, used when an artifact is re-uploaded
    pub async fn save(&self, file: FileRef) -> RepoResult<FileRef> {
        let thing = file
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("File ref has no id".to_string()))?;
        let rid = parse_record_id(&thing.to_string())?;
        let mut file = file;
        file.id = None;
        let updated: Option<FileRef> = self.base.db().update(rid).content(file).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update file ref".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FileRef>> {
        let thing = parse_record_id(id)?;
        let file: Option<FileRef> = self.base.db().select(thing).await?;
        Ok(file)
    }

    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<FileRef>> {
        let oid = order_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM file_ref WHERE order_id = $oid ORDER BY created_at ASC")
            .bind(("oid", oid))
            .await?;
        let files: Vec<FileRef> = result.take(0)?;
        Ok(files)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<FileRef>> {
        let thing = parse_record_id(id)?;
        let deleted: Option<FileRef> = self.base.db().delete(thing).await?;
        Ok(deleted)
    }
}

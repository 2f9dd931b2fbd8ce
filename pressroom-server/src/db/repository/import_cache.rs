//! Import Cache Repository
//!
//! Upsert keyed on the external storefront id. Re-importing the same source
//! order refreshes the cached payload instead of inserting a second row.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::ImportCacheRow;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "import_cache";

#[derive(Clone)]
pub struct ImportCacheRepository {
    base: BaseRepository,
}

impl ImportCacheRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_external_ref(
        &self,
        external_ref: &str,
    ) -> RepoResult<Option<ImportCacheRow>> {
        let external = external_ref.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM import_cache WHERE external_ref = $external LIMIT 1")
            .bind(("external", external))
            .await?;
        let rows: Vec<ImportCacheRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn upsert(&self, row: ImportCacheRow) -> RepoResult<ImportCacheRow> {
        if let Some(existing) = self.find_by_external_ref(&row.external_ref).await? {
            let thing = existing
                .id
                .ok_or_else(|| RepoError::Database("Cache row without id".to_string()))?;
            let rid = parse_record_id(&thing.to_string())?;
            let mut row = row;
            row.id = None;
            row.fetched_at = now_millis();
            let updated: Option<ImportCacheRow> =
                self.base.db().update(rid).content(row).await?;
            return updated
                .ok_or_else(|| RepoError::Database("Failed to update import cache".to_string()));
        }
        let created: Option<ImportCacheRow> = self.base.db().create(TABLE).content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create import cache row".to_string()))
    }
}

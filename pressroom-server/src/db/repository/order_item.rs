//! OrderItem Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::OrderItem;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order_item";

#[derive(Clone)]
pub struct OrderItemRepository {
    base: BaseRepository,
}

impl OrderItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderItem>> {
        let thing = parse_record_id(id)?;
        let item: Option<OrderItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// All items of one order, creation order
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let oid = parse_record_id(order_id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order_id = $oid ORDER BY created_at ASC")
            .bind(("oid", oid))
            .await?;
        let items: Vec<OrderItem> = result.take(0)?;
        Ok(items)
    }

    /// All items across all orders; callers narrow by visibility
    pub async fn find_all(&self) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self.base.db().select(TABLE).await?;
        Ok(items)
    }

    pub async fn create(&self, item: OrderItem) -> RepoResult<OrderItem> {
        let created: Option<OrderItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order item".to_string()))
    }

    /// Write back a full item row. The workflow engine mutates the row in
    /// memory; persistence is a single replace.
    pub async fn save(&self, item: OrderItem) -> RepoResult<OrderItem> {
        let thing = item
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Item has no id".to_string()))?;
        let rid = parse_record_id(&thing.to_string())?;
        let mut item = item;
        // The target record is named by `rid`; a serialized id in the content
        // document makes SurrealDB reject the update.
        item.id = None;
        item.updated_at = now_millis();
        let updated: Option<OrderItem> = self.base.db().update(rid).content(item).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update order item".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        let deleted: Option<OrderItem> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}

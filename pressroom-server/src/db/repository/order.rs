//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

// "order" is a reserved word in SurrealQL
const TABLE: &str = "order_record";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All non-archived orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE is_archived = false ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Archived orders only
    pub async fn find_archived(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE is_archived = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Lookup by the manually entered order number
    pub async fn find_by_order_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number = order_number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE order_number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Lookup by the external storefront reference
    pub async fn find_by_external_ref(&self, external_ref: &str) -> RepoResult<Option<Order>> {
        let external = external_ref.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order_record WHERE external_ref = $external LIMIT 1")
            .bind(("external", external))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Insert a validated order row. Item rows are written separately by the
    /// caller; duplicate order numbers are rejected by the unique index.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self
            .base
            .db()
            .create(TABLE)
            .content(order)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("idx_order_number") {
                    RepoError::Duplicate("Order number already exists".to_string())
                } else {
                    RepoError::Database(msg)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Patch order info fields. Workflow state lives on items, not here.
    pub async fn update_info(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut existing: Order = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if let Some(customer) = data.customer {
            existing.customer = customer;
        }
        if let Some(notes) = data.notes {
            existing.notes = Some(notes);
        }
        if let Some(delivery_date) = data.delivery_date {
            existing.delivery_date = delivery_date;
        }
        if let Some(total) = data.total {
            existing.total = total;
        }
        if let Some(payment_status) = data.payment_status {
            existing.payment_status = payment_status;
        }
        if let Some(is_archived) = data.is_archived {
            existing.is_archived = is_archived;
        }
        existing.updated_at = now_millis();
        // A serialized id inside the content document makes SurrealDB reject
        // the update; the target is already named by `thing`.
        existing.id = None;

        let updated: Option<Order> = self
            .base
            .db()
            .update(thing)
            .content(existing)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update order".to_string()))
    }

    /// Mark the order completed (all items dispatched)
    pub async fn mark_completed(&self, id: &str) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut existing: Order = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;
        existing.is_completed = true;
        existing.updated_at = now_millis();
        existing.id = None;
        let updated: Option<Order> = self.base.db().update(thing).content(existing).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update order".to_string()))
    }

    /// Hard delete with cascade: items, timeline rows and file metadata go
    /// with the order. Only reachable from the admin/sales delete action.
    pub async fn delete_cascade(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        let id_str = thing.to_string();
        self.base
            .db()
            .query("DELETE FROM order_item WHERE order_id = $oid")
            .query("DELETE FROM timeline WHERE order_id = $oid")
            .query("DELETE FROM file_ref WHERE order_id = $oid_str")
            .bind(("oid", thing.clone()))
            .bind(("oid_str", id_str))
            .await?;
        let deleted: Option<Order> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}

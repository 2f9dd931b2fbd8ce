//! Import Cache Model
//!
//! One row per external storefront order id, upserted on every successful
//! fetch. Repeated imports of the same source order therefore never duplicate
//! the cache.

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCacheRow {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    /// External storefront order id (unique)
    pub external_ref: String,
    /// Normalized order number
    pub order_number: String,
    /// Raw order payload as fetched from the bridge
    pub payload: serde_json::Value,
    pub fetched_at: i64,
}

//! Activity Log Model
//!
//! Best-effort operational log of mutations. Written by the side-effect saga;
//! failures are logged and never block the primary write.

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type ActivityLogId = Thing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ActivityLogId>,
    pub actor_id: String,
    pub actor_name: String,
    /// "order.created", "item.moved", "vendor.updated", ...
    pub action: String,
    pub resource: String,
    pub resource_id: String,
    #[serde(default)]
    pub details: serde_json::Value,
    pub created_at: i64,
}

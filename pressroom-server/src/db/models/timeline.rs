//! Timeline Model
//!
//! Append-only audit trail per order/item. Rows are never mutated or deleted;
//! the only way a timeline row disappears is the cascading delete of its
//! parent order.

use super::serde_thing;
use serde::{Deserialize, Serialize};
use shared::workflow::Stage;
use surrealdb::sql::Thing;

pub type TimelineId = Thing;

/// One timeline row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TimelineId>,
    #[serde(with = "serde_thing")]
    pub order_id: Thing,
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_id: Option<Thing>,
    /// Stage the item was in when the action happened
    pub stage: Stage,
    /// Short machine-readable action name ("moved", "approved", "outsourced", ...)
    pub action: String,
    pub actor_id: String,
    pub actor_name: String,
    /// The mandatory transition note
    pub note: String,
    /// File-ref ids attached to this entry
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: i64,
}

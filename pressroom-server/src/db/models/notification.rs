//! Notification Model

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type NotificationId = Thing;

/// One notification row, one recipient. Fan-out writes one row per recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<NotificationId>,
    /// Profile record id of the recipient
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: i64,
}

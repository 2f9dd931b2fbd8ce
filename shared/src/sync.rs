//! Realtime change-feed payloads.
//!
//! Every repository mutation on the server publishes a [`SyncPayload`] over the
//! socket.io channel. Clients treat any payload as a refetch signal for the
//! named resource. The embedded `data` is a convenience, never authoritative.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One change-feed notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type ("order", "order_item", "timeline", "vendor", ...)
    pub resource: String,
    /// Monotonic per-resource version, assigned by the server
    pub version: u64,
    /// "created" | "updated" | "deleted"
    pub action: String,
    /// Record ID of the affected row
    pub id: String,
    /// Snapshot of the row (None for deletions)
    pub data: Option<serde_json::Value>,
}

/// Sync status snapshot, returned to reconnecting clients.
///
/// The `epoch` changes on every server restart; a client holding a different
/// epoch must drop its caches and refetch everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub epoch: u64,
    /// Current version per resource type
    pub versions: HashMap<String, u64>,
}

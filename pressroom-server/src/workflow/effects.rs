//! Side-effect saga
//!
//! Timeline entries, notifications and activity log rows written after a
//! primary mutation commits. All best-effort: a failure here is logged and
//! never propagated, so the workflow write itself cannot be rolled back or
//! blocked by its audit trail.

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ActivityLog, Notification, TimelineEntry};
use shared::util::now_millis;
use shared::workflow::Stage;
use surrealdb::sql::Thing;
use tracing::warn;

/// Append a timeline entry for an order/item action
pub async fn record_timeline(
    state: &ServerState,
    order_id: &Thing,
    item_id: Option<&Thing>,
    stage: Stage,
    action: &str,
    note: &str,
    attachments: Vec<String>,
    actor: &CurrentUser,
) {
    let entry = TimelineEntry {
        id: None,
        order_id: order_id.clone(),
        item_id: item_id.cloned(),
        stage,
        action: action.to_string(),
        actor_id: actor.id.clone(),
        actor_name: actor.display_name.clone(),
        note: note.to_string(),
        attachments,
        created_at: now_millis(),
    };
    if let Err(e) = state.timeline.append(entry).await {
        warn!(target: "workflow", error = %e, action, "Timeline append failed");
    }
}

/// Fan a notification out to a precomputed recipient list
pub async fn notify(
    state: &ServerState,
    recipient_ids: &[String],
    title: &str,
    body: &str,
    order_id: Option<&str>,
    item_id: Option<&str>,
) {
    if recipient_ids.is_empty() {
        return;
    }
    let now = now_millis();
    let rows = recipient_ids
        .iter()
        .map(|recipient_id| Notification {
            id: None,
            recipient_id: recipient_id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            order_id: order_id.map(str::to_string),
            item_id: item_id.map(str::to_string),
            is_read: false,
            created_at: now,
        })
        .collect();
    match state.notifications.create_many(rows).await {
        Ok(written) => {
            if written > 0 {
                state
                    .broadcast_sync::<()>("notification", "created", "", None)
                    .await;
            }
        }
        Err(e) => warn!(target: "workflow", error = %e, title, "Notification fan-out failed"),
    }
}

/// Record an operational activity log row
pub async fn log_activity(
    state: &ServerState,
    actor: &CurrentUser,
    action: &str,
    resource: &str,
    resource_id: &str,
    details: serde_json::Value,
) {
    let entry = ActivityLog {
        id: None,
        actor_id: actor.id.clone(),
        actor_name: actor.display_name.clone(),
        action: action.to_string(),
        resource: resource.to_string(),
        resource_id: resource_id.to_string(),
        details,
        created_at: now_millis(),
    };
    if let Err(e) = state.activity.append(entry).await {
        warn!(target: "workflow", error = %e, action, "Activity log append failed");
    }
}

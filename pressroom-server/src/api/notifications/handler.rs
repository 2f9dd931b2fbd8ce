//! Notification API Handlers
//!
//! Every route is scoped to the caller's own feed; there is no cross-user
//! notification access, not even for admins.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Notification;
use crate::utils::{AppError, AppResult};

/// GET /api/notifications - newest first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .notifications
        .find_by_recipient(&current_user.id)
        .await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    let count = state.notifications.unread_count(&current_user.id).await?;
    Ok(Json(serde_json::json!({ "unread": count })))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let notification = state
        .notifications
        .mark_read(&id, &current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {} not found", id)))?;
    Ok(Json(notification))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    state.notifications.mark_all_read(&current_user.id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

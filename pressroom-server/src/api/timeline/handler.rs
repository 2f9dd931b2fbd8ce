//! Timeline API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::TimelineEntry;
use crate::utils::{AppError, AppResult};
use crate::workflow::visibility;

/// GET /api/orders/:id/timeline - chronological audit trail
pub async fn for_order(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TimelineEntry>>> {
    let items = state.items.find_by_order(&id).await?;
    if !visibility::order_visible(&items, &current_user) {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }
    let entries = state.timeline.find_by_order(&id).await?;
    Ok(Json(entries))
}

/// GET /api/items/:id/timeline
pub async fn for_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TimelineEntry>>> {
    let item = state
        .items
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {} not found", id)))?;
    if !visibility::item_visible(&item, &current_user) {
        return Err(AppError::not_found(format!("Item {} not found", id)));
    }
    let entries = state.timeline.find_by_item(&id).await?;
    Ok(Json(entries))
}

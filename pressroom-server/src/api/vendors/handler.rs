//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Vendor, VendorCreate, VendorUpdate};
use crate::utils::{AppError, AppResult};
use crate::workflow::effects;

const RESOURCE: &str = "vendor";

/// GET /api/vendors - active vendors
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendor>>> {
    let vendors = state.vendors.find_all().await?;
    Ok(Json(vendors))
}

/// GET /api/vendors/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vendor>> {
    let vendor = state
        .vendors
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {} not found", id)))?;
    Ok(Json(vendor))
}

/// POST /api/vendors
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<VendorCreate>,
) -> AppResult<Json<Vendor>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let vendor = state.vendors.create(payload).await?;
    let id = vendor.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    effects::log_activity(
        &state,
        &current_user,
        "vendor.created",
        RESOURCE,
        &id,
        serde_json::json!({ "name": vendor.name }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&vendor))
        .await;
    Ok(Json(vendor))
}

/// PUT /api/vendors/:id
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VendorUpdate>,
) -> AppResult<Json<Vendor>> {
    let vendor = state.vendors.update(&id, payload).await?;

    effects::log_activity(
        &state,
        &current_user,
        "vendor.updated",
        RESOURCE,
        &id,
        serde_json::json!({ "name": vendor.name }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&vendor))
        .await;
    Ok(Json(vendor))
}

/// DELETE /api/vendors/:id - soft delete; history keeps its snapshots
pub async fn deactivate(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let removed = state.vendors.deactivate(&id).await?;
    if !removed {
        return Err(AppError::not_found(format!("Vendor {} not found", id)));
    }

    effects::log_activity(
        &state,
        &current_user,
        "vendor.deactivated",
        RESOURCE,
        &id,
        serde_json::Value::Null,
    )
    .await;
    state
        .broadcast_sync::<()>(RESOURCE, "deactivated", &id, None)
        .await;
    Ok(Json(serde_json::json!({ "deactivated": true })))
}

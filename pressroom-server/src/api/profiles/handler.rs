//! Profile API Handlers
//!
//! Accounts are deactivated, never deleted: timeline rows and activity logs
//! keep pointing at a real profile.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ProfileCreate, ProfileResponse, ProfileUpdate};
use crate::utils::{AppError, AppResult};
use crate::workflow::effects;

const RESOURCE: &str = "profile";

/// GET /api/profiles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProfileResponse>>> {
    let profiles = state.profiles.find_all().await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// GET /api/profiles/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .profiles
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", id)))?;
    Ok(Json(profile.into()))
}

/// POST /api/profiles
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ProfileCreate>,
) -> AppResult<Json<ProfileResponse>> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::validation("Password must be at least 8 characters"));
    }
    let profile = state.profiles.create(payload).await?;
    let id = profile.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    effects::log_activity(
        &state,
        &current_user,
        "profile.created",
        RESOURCE,
        &id,
        serde_json::json!({ "username": profile.username, "role": profile.role }),
    )
    .await;
    state
        .broadcast_sync::<()>(RESOURCE, "created", &id, None)
        .await;
    Ok(Json(profile.into()))
}

/// PUT /api/profiles/:id
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    if let Some(password) = &payload.password {
        if password.len() < 8 {
            return Err(AppError::validation("Password must be at least 8 characters"));
        }
    }
    // No self-deactivation
    if payload.is_active == Some(false) && id == current_user.id {
        return Err(AppError::validation("You cannot deactivate your own account"));
    }

    let profile = state.profiles.update(&id, payload).await?;

    effects::log_activity(
        &state,
        &current_user,
        "profile.updated",
        RESOURCE,
        &id,
        serde_json::json!({ "username": profile.username }),
    )
    .await;
    state
        .broadcast_sync::<()>(RESOURCE, "updated", &id, None)
        .await;
    Ok(Json(profile.into()))
}

//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, permissions_for};
use crate::core::ServerState;
use crate::db::models::ProfileResponse;
use crate::db::repository::verify_password;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub profile: ProfileResponse,
    pub permissions: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: shared::workflow::Role,
    pub specialty: Option<shared::workflow::Substage>,
    pub permissions: Vec<&'static str>,
}

/// POST /api/auth/login
///
/// Responds with the same error for unknown usernames, wrong passwords and
/// deactivated accounts so the login form cannot enumerate staff.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let profile = state
        .profiles
        .find_by_username(payload.username.trim())
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !profile.is_active || !verify_password(&payload.password, &profile.password_hash) {
        tracing::warn!(
            target: "security",
            username = %payload.username,
            "Failed login attempt"
        );
        return Err(AppError::invalid_credentials());
    }

    let id = profile
        .id
        .as_ref()
        .map(|t| t.to_string())
        .ok_or_else(|| AppError::internal("Profile row without id"))?;

    let token = state
        .jwt_service()
        .generate_token(
            &id,
            &profile.username,
            &profile.display_name,
            profile.role,
            profile.specialty,
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(target: "security", username = %profile.username, "Login");

    let permissions = permissions_for(profile.role).to_vec();
    Ok(Json(LoginResponse {
        token,
        profile: profile.into(),
        permissions,
    }))
}

/// GET /api/auth/me
pub async fn me(current_user: CurrentUser) -> AppResult<Json<MeResponse>> {
    let permissions = permissions_for(current_user.role).to_vec();
    Ok(Json(MeResponse {
        id: current_user.id,
        username: current_user.username,
        display_name: current_user.display_name,
        role: current_user.role,
        specialty: current_user.specialty,
        permissions,
    }))
}

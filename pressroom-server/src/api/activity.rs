//! Activity log route (admin)

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use serde::Deserialize;

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::db::models::ActivityLog;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/activity", get(recent))
        .layer(middleware::from_fn(require_admin))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

pub async fn recent(
    State(state): State<ServerState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityLog>>> {
    let rows = state.activity.find_recent(query.limit.clamp(1, 500)).await?;
    Ok(Json(rows))
}

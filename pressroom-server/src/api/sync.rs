//! Sync status route
//!
//! Clients on the socket change feed poll this after a reconnect: a changed
//! epoch means the server restarted and versions reset, so resync from
//! scratch; otherwise compare per-resource versions to find what was missed.

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use shared::sync::SyncStatus;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/status", get(status))
}

pub async fn status(State(state): State<ServerState>) -> Json<SyncStatus> {
    Json(state.sync_status())
}

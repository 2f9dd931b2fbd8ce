//! File API module

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;
use crate::services::file_storage::MAX_FILE_SIZE;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/files", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders/{order_id}", get(handler::list_for_order))
        .route("/orders/{order_id}", post(handler::upload))
        .route("/{id}", get(handler::download))
        .route("/{id}", delete(handler::delete_file))
        .route("/{id}/replace", post(handler::replace))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024))
        .layer(middleware::from_fn(require_permission("files:upload")))
}

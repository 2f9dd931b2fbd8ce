//! Timeline API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders/{id}/timeline", get(handler::for_order))
        .route("/api/items/{id}/timeline", get(handler::for_item))
}

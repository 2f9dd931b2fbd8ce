//! Order item workflow API module

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", routes())
}

fn routes() -> Router<ServerState> {
    let process_routes = Router::new()
        .route("/{id}/process", post(handler::process))
        .layer(middleware::from_fn(require_permission("items:process")));

    let approval_routes = Router::new()
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_permission("items:approve")));

    let substage_routes = Router::new()
        .route("/{id}/substage/complete", post(handler::complete_substage))
        .layer(middleware::from_fn(require_permission("items:substage")));

    let outsource_routes = Router::new()
        .route("/{id}/outsource", post(handler::start_outsource))
        .route("/{id}/outsource/advance", post(handler::advance_outsource))
        .route("/{id}/outsource/notes", post(handler::add_outsource_note))
        .layer(middleware::from_fn(require_permission("items:outsource")));

    let dispatch_routes = Router::new()
        .route("/{id}/dispatch/decision", post(handler::dispatch_decision))
        .route("/{id}/dispatch/finalize", post(handler::dispatch_finalize))
        .layer(middleware::from_fn(require_permission("items:dispatch")));

    process_routes
        .merge(approval_routes)
        .merge(substage_routes)
        .merge(outsource_routes)
        .merge(dispatch_routes)
}

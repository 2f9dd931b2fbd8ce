//! Order API module

mod handler;
mod import;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // Reads are open to every authenticated role; visibility narrows per
    // viewer inside the handler.
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let intake_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("orders:create")));

    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("orders:update")));

    let archive_routes = Router::new()
        .route("/{id}/archive", post(handler::archive))
        .layer(middleware::from_fn(require_permission("orders:archive")));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete_order))
        .layer(middleware::from_fn(require_permission("orders:delete")));

    let duplicate_routes = Router::new()
        .route("/check-duplicate", post(handler::check_duplicate))
        .layer(middleware::from_fn(require_permission(
            "orders:check_duplicate",
        )));

    let import_routes = Router::new()
        .route("/import", post(import::import_order))
        .layer(middleware::from_fn(require_permission("orders:import")));

    read_routes
        .merge(intake_routes)
        .merge(update_routes)
        .merge(archive_routes)
        .merge(delete_routes)
        .merge(duplicate_routes)
        .merge(import_routes)
}

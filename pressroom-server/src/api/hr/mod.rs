//! HR API module
//!
//! Staff manage their own leave; review, leave-type setup, holidays and
//! payroll are admin-only.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/hr", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/leave-types", get(handler::leave_types))
        .route("/balances", get(handler::my_balances))
        .route("/leave-requests", get(handler::my_leave_requests))
        .route("/leave-requests", post(handler::create_leave_request))
        .route(
            "/leave-requests/{id}/cancel",
            post(handler::cancel_leave_request),
        )
        .route("/holidays", get(handler::holidays))
        .route("/payroll", get(handler::my_payroll));

    let admin_routes = Router::new()
        .route("/leave-types", post(handler::create_leave_type))
        .route("/leave-types/{id}", put(handler::update_leave_type))
        .route("/leave-requests/pending", get(handler::pending_requests))
        .route(
            "/leave-requests/{id}/review",
            post(handler::review_leave_request),
        )
        .route("/balances/{profile_id}", get(handler::balances_for))
        .route("/holidays", post(handler::create_holiday))
        .route("/holidays/{id}", delete(handler::delete_holiday))
        .route("/payroll", post(handler::create_payroll))
        .route("/payroll/{profile_id}", get(handler::payroll_for))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}

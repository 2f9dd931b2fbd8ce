//! Server implementation
//!
//! Router assembly and HTTP serving.

use axum::{Router, middleware as axum_middleware};
use socketioxide::layer::SocketIoLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(api::auth::router())
        .merge(api::orders::router())
        .merge(api::items::router())
        .merge(api::timeline::router())
        .merge(api::vendors::router())
        .merge(api::notifications::router())
        .merge(api::files::router())
        .merge(api::profiles::router())
        .merge(api::hr::router())
        .merge(api::activity::router())
        .merge(api::sync::router())
        .merge(api::health::router())
}

/// Build the fully configured application: routes, auth, change feed socket,
/// tower-http layers.
pub fn build_app(state: ServerState, socket_layer: SocketIoLayer) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(socket_layer)
        .with_state(state)
}

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let (state, socket_layer) = ServerState::initialize(&self.config).await?;
        let app = build_app(state, socket_layer);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Pressroom server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}

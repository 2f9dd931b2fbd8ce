//! Pressroom Server - print shop order management
//!
//! # Architecture
//!
//! - **Orders** (`api::orders`, `db`): intake, import, archive, cascade delete
//! - **Workflow** (`workflow`): per-item stage machine with approvals,
//!   production substages, outsourcing and dispatch
//! - **Auth** (`auth`): JWT + Argon2, role-based permissions
//! - **Change feed** (`services::change_feed`): Socket.IO broadcast with
//!   per-resource versions
//! - **HR** (`api::hr`): leave, holidays, payroll
//!
//! # Module structure
//!
//! ```text
//! pressroom-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, permissions, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── workflow/      # transition engine and side effects
//! ├── db/            # embedded SurrealDB models and repositories
//! ├── import/        # WooCommerce bridge client
//! ├── services/      # change feed, file storage
//! ├── cache/         # TTL read cache
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod core;
pub mod db;
pub mod import;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Load .env, make sure the work dir exists, and bring up logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(None, log_dir.to_str());

    // Keep a month of logs around
    if let Some(dir) = log_dir.to_str() {
        let _ = cleanup_old_logs(dir, 30);
    }

    Ok(())
}

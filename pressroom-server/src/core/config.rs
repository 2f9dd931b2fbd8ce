//! Server configuration
//!
//! All values come from environment variables with defaults.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | ./pressroom-data | work directory (db, logs, uploads) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| production |
//! | STOREFRONT_URL | (unset) | WooCommerce bridge base URL |
//! | STOREFRONT_TOKEN | (unset) | bearer token for the bridge |
//! | ADMIN_USERNAME | admin | seeded admin account |
//! | ADMIN_PASSWORD | admin123 | seeded admin password |

use crate::auth::JwtConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding database, logs and uploads
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    /// development | production
    pub environment: String,
    /// Base URL of the storefront bridge; import is disabled when unset
    pub storefront_url: Option<String>,
    pub storefront_token: Option<String>,
    /// Bridge request timeout in milliseconds
    pub storefront_timeout_ms: u64,
    /// Seeded admin credentials, applied only when the profile table is empty
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./pressroom-data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            storefront_url: std::env::var("STOREFRONT_URL").ok(),
            storefront_token: std::env::var("STOREFRONT_TOKEN").ok(),
            storefront_timeout_ms: std::env::var("STOREFRONT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
        }
    }

    /// Override work_dir and port, used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Schema is bootstrapped at startup:
//! unique indexes for the fields the workflow depends on, plus a seeded admin
//! account on first run.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "pressroom";
const DATABASE: &str = "main";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database and bootstrap the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        let service = Self { db };
        service.bootstrap_schema().await?;
        tracing::info!(path = %db_path, "Database ready (SurrealDB/RocksDB)");
        Ok(service)
    }

    /// In-memory database for tests
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory db: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        let service = Self { db };
        service.bootstrap_schema().await?;
        Ok(service)
    }

    /// Define the indexes the workflow relies on. Idempotent.
    async fn bootstrap_schema(&self) -> Result<(), AppError> {
        self.db
            .query(
                r#"
                DEFINE INDEX IF NOT EXISTS idx_order_number ON TABLE order_record COLUMNS order_number UNIQUE;
                DEFINE INDEX IF NOT EXISTS idx_profile_username ON TABLE profile COLUMNS username UNIQUE;
                DEFINE INDEX IF NOT EXISTS idx_import_external_ref ON TABLE import_cache COLUMNS external_ref UNIQUE;
                DEFINE INDEX IF NOT EXISTS idx_item_order ON TABLE order_item COLUMNS order_id;
                DEFINE INDEX IF NOT EXISTS idx_timeline_order ON TABLE timeline COLUMNS order_id;
                DEFINE INDEX IF NOT EXISTS idx_notification_recipient ON TABLE notification COLUMNS recipient_id;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Schema bootstrap failed: {e}")))?;
        Ok(())
    }
}

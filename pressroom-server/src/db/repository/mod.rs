//! Repository Module
//!
//! CRUD operations over the SurrealDB tables. One repository per table, all
//! built on [`BaseRepository`]. IDs cross the boundary as "table:id" strings
//! and are parsed into `RecordId` at the edge.

// Staff
pub mod profile;

// Orders
pub mod order;
pub mod order_item;
pub mod timeline;

// Workflow support
pub mod notification;
pub mod vendor;

// Operational
pub mod activity_log;
pub mod file_ref;
pub mod import_cache;

// HR
pub mod hr;

// Re-exports
pub use activity_log::ActivityLogRepository;
pub use file_ref::FileRefRepository;
pub use hr::HrRepository;
pub use import_cache::ImportCacheRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use order_item::OrderItemRepository;
pub use profile::{ProfileRepository, hash_password, verify_password};
pub use timeline::TimelineRepository;
pub use vendor::VendorRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:id" string into a RecordId, with a validation error on junk
pub(crate) fn parse_record_id(id: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}

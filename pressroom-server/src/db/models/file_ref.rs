//! FileRef Model
//!
//! Metadata row for an uploaded artifact. The object itself lives under the
//! work dir; replacing a file deletes the prior object and this row.

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type FileRefId = Thing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<FileRefId>,
    pub order_id: String,
    #[serde(default)]
    pub item_id: Option<String>,
    pub file_name: String,
    /// Path relative to the uploads root
    pub path: String,
    pub mime: String,
    pub size: i64,
    pub uploaded_by: String,
    pub created_at: i64,
}

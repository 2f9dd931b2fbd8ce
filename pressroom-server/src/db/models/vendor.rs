//! Vendor Model

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

pub type VendorId = Thing;

/// Outsource vendor row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<VendorId>,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Work types this vendor handles (foiling, binding, ...)
    #[serde(default)]
    pub work_types: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Vendor creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VendorCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub work_types: Vec<String>,
}

/// Vendor update payload (all optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub work_types: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

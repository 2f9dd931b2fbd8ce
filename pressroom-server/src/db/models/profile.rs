//! Profile Model (staff accounts)

use super::serde_thing;
use serde::{Deserialize, Serialize};
use shared::workflow::{Role, Substage};
use surrealdb::sql::Thing;

pub type ProfileId = Thing;

/// Staff profile row. `password_hash` never leaves the server; API responses
/// use [`ProfileResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ProfileId>,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    /// Production specialty; narrows visibility for production viewers
    #[serde(default)]
    pub specialty: Option<Substage>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Profile response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub specialty: Option<Substage>,
    pub is_active: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id.map(|t| t.to_string()).unwrap_or_default(),
            username: p.username,
            display_name: p.display_name,
            role: p.role,
            specialty: p.specialty,
            is_active: p.is_active,
        }
    }
}

/// Create profile payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub specialty: Option<Substage>,
}

/// Update profile payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub specialty: Option<Substage>,
    pub is_active: Option<bool>,
}

//! Profile Repository
//!
//! Staff accounts. Passwords are hashed with Argon2id at the repository
//! boundary; plaintext never reaches a row.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Profile, ProfileCreate, ProfileUpdate};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::workflow::{Department, Role};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "profile";

pub fn hash_password(password: &str) -> RepoResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Clone)]
pub struct ProfileRepository {
    base: BaseRepository,
}

impl ProfileRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let profiles: Vec<Profile> = self
            .base
            .db()
            .query("SELECT * FROM profile ORDER BY username ASC")
            .await?
            .take(0)?;
        Ok(profiles)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Profile>> {
        let thing = parse_record_id(id)?;
        let profile: Option<Profile> = self.base.db().select(thing).await?;
        Ok(profile)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Profile>> {
        let name = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM profile WHERE username = $name LIMIT 1")
            .bind(("name", name))
            .await?;
        let profiles: Vec<Profile> = result.take(0)?;
        Ok(profiles.into_iter().next())
    }

    /// Active staff whose role belongs to one department. Notification fan-out
    /// targets these rows.
    pub async fn find_active_by_department(
        &self,
        department: Department,
    ) -> RepoResult<Vec<Profile>> {
        let all = self.find_all().await?;
        Ok(all
            .into_iter()
            .filter(|p| p.is_active && p.role.department() == Some(department))
            .collect())
    }

    pub async fn find_active_by_role(&self, role: Role) -> RepoResult<Vec<Profile>> {
        let all = self.find_all().await?;
        Ok(all
            .into_iter()
            .filter(|p| p.is_active && p.role == role)
            .collect())
    }

    pub async fn create(&self, data: ProfileCreate) -> RepoResult<Profile> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username {} already exists",
                data.username
            )));
        }
        let profile = Profile {
            id: None,
            username: data.username,
            display_name: data.display_name,
            password_hash: hash_password(&data.password)?,
            role: data.role,
            specialty: data.specialty,
            is_active: true,
        };
        let created: Option<Profile> = self.base.db().create(TABLE).content(profile).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create profile".to_string()))
    }

    pub async fn update(&self, id: &str, data: ProfileUpdate) -> RepoResult<Profile> {
        let thing = parse_record_id(id)?;
        let mut existing: Profile = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Profile {} not found", id)))?;

        if let Some(password) = data.password {
            existing.password_hash = hash_password(&password)?;
        }
        if let Some(display_name) = data.display_name {
            existing.display_name = display_name;
        }
        if let Some(role) = data.role {
            existing.role = role;
        }
        if let Some(specialty) = data.specialty {
            existing.specialty = Some(specialty);
        }
        if let Some(is_active) = data.is_active {
            existing.is_active = is_active;
        }

        existing.id = None;
        let updated: Option<Profile> = self.base.db().update(thing).content(existing).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update profile".to_string()))
    }

    /// Seed the default admin account on an empty profile table
    pub async fn seed_admin(&self, username: &str, password: &str) -> RepoResult<()> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(());
        }
        self.create(ProfileCreate {
            username: username.to_string(),
            password: password.to_string(),
            display_name: "Administrator".to_string(),
            role: Role::Admin,
            specialty: None,
        })
        .await?;
        tracing::info!(username = %username, "Seeded default admin account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }
}

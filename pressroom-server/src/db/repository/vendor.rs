//! Vendor Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Vendor, VendorCreate, VendorUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "vendor";

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Active vendors, name order
    pub async fn find_all(&self) -> RepoResult<Vec<Vendor>> {
        let vendors: Vec<Vendor> = self
            .base
            .db()
            .query("SELECT * FROM vendor WHERE is_active = true ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(vendors)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Vendor>> {
        let thing = parse_record_id(id)?;
        let vendor: Option<Vendor> = self.base.db().select(thing).await?;
        Ok(vendor)
    }

    pub async fn create(&self, data: VendorCreate) -> RepoResult<Vendor> {
        let vendor = Vendor {
            id: None,
            name: data.name,
            phone: data.phone,
            email: data.email,
            address: data.address,
            work_types: data.work_types,
            is_active: true,
        };
        let created: Option<Vendor> = self.base.db().create(TABLE).content(vendor).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create vendor".to_string()))
    }

    pub async fn update(&self, id: &str, data: VendorUpdate) -> RepoResult<Vendor> {
        let thing = parse_record_id(id)?;
        let mut existing: Vendor = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        if let Some(name) = data.name {
            existing.name = name;
        }
        if let Some(phone) = data.phone {
            existing.phone = phone;
        }
        if let Some(email) = data.email {
            existing.email = Some(email);
        }
        if let Some(address) = data.address {
            existing.address = Some(address);
        }
        if let Some(work_types) = data.work_types {
            existing.work_types = work_types;
        }
        if let Some(is_active) = data.is_active {
            existing.is_active = is_active;
        }

        existing.id = None;
        let updated: Option<Vendor> = self.base.db().update(thing).content(existing).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update vendor".to_string()))
    }

    /// Soft delete: the vendor stays referenced by historical outsource
    /// snapshots, so rows are deactivated rather than removed.
    pub async fn deactivate(&self, id: &str) -> RepoResult<bool> {
        let vendor = self
            .update(
                id,
                VendorUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        Ok(!vendor.is_active)
    }
}

//! Server state

use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::sync::{SyncPayload, SyncStatus};
use shared::util::now_millis;

use crate::auth::JwtService;
use crate::cache::{DEFAULT_TTL, TtlCache};
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{Order, OrderItem};
use crate::db::repository::{
    ActivityLogRepository, FileRefRepository, HrRepository, ImportCacheRepository,
    NotificationRepository, OrderItemRepository, OrderRepository, ProfileRepository,
    TimelineRepository, VendorRepository,
};
use crate::import::{PendingImports, StorefrontClient};
use crate::services::{ChangeFeedService, FileStorageService};
use crate::utils::AppError;
use socketioxide::layer::SocketIoLayer;

/// Per-resource version counters for the change feed. Lock-free, atomic
/// increments; clients compare versions to spot missed updates.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    pub fn snapshot(&self) -> std::collections::HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

/// Rows backing a cached order list: each order with its items, unfiltered.
/// Visibility and redaction are applied per viewer after the cache.
pub type OrderRows = Vec<(Order, Vec<OrderItem>)>;

/// Shared server state. Cheap to clone; every field is a handle.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,

    pub orders: OrderRepository,
    pub items: OrderItemRepository,
    pub timeline: TimelineRepository,
    pub notifications: NotificationRepository,
    pub vendors: VendorRepository,
    pub profiles: ProfileRepository,
    pub activity: ActivityLogRepository,
    pub files: FileRefRepository,
    pub import_cache: ImportCacheRepository,
    pub hr: HrRepository,

    pub jwt_service: Arc<JwtService>,
    pub resource_versions: Arc<ResourceVersions>,
    /// Boot timestamp; clients resync from scratch when it changes
    pub epoch: u64,
    pub change_feed: ChangeFeedService,
    pub file_storage: FileStorageService,
    pub order_cache: Arc<TtlCache<OrderRows>>,

    pub storefront: Option<StorefrontClient>,
    pub pending_imports: Arc<PendingImports>,
}

impl ServerState {
    /// Full startup: work dir layout, on-disk database, admin seed.
    pub async fn initialize(config: &Config) -> Result<(Self, SocketIoLayer), AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {}", e)))?;

        let db_path = config.database_dir().join("pressroom.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let (state, layer) = Self::from_db(config.clone(), db_service)?;

        state
            .profiles
            .seed_admin(&config.admin_username, &config.admin_password)
            .await?;

        Ok((state, layer))
    }

    /// Build state on an already-open database. Used by [`initialize`] and by
    /// tests with the in-memory engine.
    pub fn from_db(
        config: Config,
        db_service: DbService,
    ) -> Result<(Self, SocketIoLayer), AppError> {
        let db = db_service.db;
        let (change_feed, layer) = ChangeFeedService::new();

        let storefront = match &config.storefront_url {
            Some(url) => Some(StorefrontClient::new(
                url.clone(),
                config.storefront_token.clone(),
                config.storefront_timeout_ms,
            )?),
            None => None,
        };

        let file_storage = FileStorageService::new(config.uploads_dir());

        let state = Self {
            orders: OrderRepository::new(db.clone()),
            items: OrderItemRepository::new(db.clone()),
            timeline: TimelineRepository::new(db.clone()),
            notifications: NotificationRepository::new(db.clone()),
            vendors: VendorRepository::new(db.clone()),
            profiles: ProfileRepository::new(db.clone()),
            activity: ActivityLogRepository::new(db.clone()),
            files: FileRefRepository::new(db.clone()),
            import_cache: ImportCacheRepository::new(db.clone()),
            hr: HrRepository::new(db.clone()),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            resource_versions: Arc::new(ResourceVersions::new()),
            epoch: now_millis() as u64,
            change_feed,
            file_storage,
            order_cache: Arc::new(TtlCache::new(DEFAULT_TTL)),
            storefront,
            pending_imports: Arc::new(PendingImports::new()),
            config,
            db,
        };

        Ok((state, layer))
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Broadcast a resource change: bump the version, drop cached order
    /// lists, emit to the change feed.
    pub async fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        if matches!(resource, "order" | "order_item") {
            self.order_cache.invalidate_all();
        }
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        self.change_feed.publish(&payload).await;
    }

    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            epoch: self.epoch,
            versions: self.resource_versions.snapshot(),
        }
    }

    /// Orders with their items, through the read cache
    pub async fn order_rows(&self, archived: bool) -> Result<Arc<OrderRows>, AppError> {
        let key = if archived {
            "orders:archived"
        } else {
            "orders:active"
        };
        self.order_cache
            .get_or_fetch(key, || async {
                let orders = if archived {
                    self.orders.find_archived().await?
                } else {
                    self.orders.find_all().await?
                };
                let all_items = self.items.find_all().await?;
                let mut by_order: std::collections::HashMap<String, Vec<OrderItem>> =
                    std::collections::HashMap::new();
                for item in all_items {
                    by_order
                        .entry(item.order_id.to_string())
                        .or_default()
                        .push(item);
                }
                let rows = orders
                    .into_iter()
                    .map(|order| {
                        let key = order
                            .id
                            .as_ref()
                            .map(|t| t.to_string())
                            .unwrap_or_default();
                        let items = by_order.remove(&key).unwrap_or_default();
                        (order, items)
                    })
                    .collect();
                Ok::<_, AppError>(rows)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("order"), 0);
        assert_eq!(versions.increment("order"), 1);
        assert_eq!(versions.increment("order"), 2);
        assert_eq!(versions.increment("vendor"), 1);
        assert_eq!(versions.get("order"), 2);
    }
}

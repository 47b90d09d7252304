//! Wiring from configuration to a ready delivery target service.

use std::sync::Arc;

use anyhow::anyhow;
use configs::{AppConfig, StoreBackend};
use migration::MigratorTrait;
use tracing::info;

use crate::delivery_target::{DeliveryTargetService, StoreProjectService};
use crate::storage::{DocumentStore, MemoryDocumentStore, Repository, SeaOrmDocumentStore};

/// Open the configured document store. The postgres backend is migrated
/// before it is returned.
pub async fn open_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match cfg.store.backend {
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
        StoreBackend::File => {
            let path = cfg
                .store
                .data_file
                .as_deref()
                .ok_or_else(|| anyhow!("store.data_file is required for the file backend"))?;
            MemoryDocumentStore::open(path).await? as Arc<dyn DocumentStore>
        }
        StoreBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            Arc::new(SeaOrmDocumentStore::new(db))
        }
    };
    info!(backend = ?cfg.store.backend, "document_store_ready");
    Ok(store)
}

/// Build the service with store-backed project lookup.
pub fn build_delivery_target_service(store: Arc<dyn DocumentStore>) -> DeliveryTargetService<StoreProjectService> {
    let projects = Arc::new(StoreProjectService::new(Repository::new(store.clone())));
    DeliveryTargetService::new(Repository::new(store.clone()), Repository::new(store), projects)
}

/// Initialise logging, open the store and build the service.
pub async fn init(cfg: &AppConfig) -> anyhow::Result<(Arc<dyn DocumentStore>, DeliveryTargetService<StoreProjectService>)> {
    common::utils::logging::init_logging(cfg.logging.json, cfg.logging.filter.as_deref());
    let store = open_store(cfg).await?;
    let svc = build_delivery_target_service(store.clone());
    Ok((store, svc))
}

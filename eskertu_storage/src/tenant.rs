use std::collections::BTreeMap;

use async_trait::async_trait;
use eskertu_models::tenant::{NewTenant, Tenant, TenantId};
use tokio::sync::RwLock;

use crate::{StorageError, TenantReadError};

/// Result of reading the whole tenant collection.
///
/// Rows that could not be decoded are reported in `errors` instead of failing the read.
#[derive(Debug, Default)]
pub struct TenantListing {
    pub tenants: Vec<Tenant>,
    pub errors: Vec<TenantReadError>,
}

#[async_trait]
pub trait TenantStorage: Send + Sync {
    async fn get_all(&self) -> Result<TenantListing, StorageError>;
    async fn get(&self, id: TenantId) -> Result<Option<Tenant>, StorageError>;
    async fn insert(&self, tenant: NewTenant) -> Result<Tenant, StorageError>;
    async fn update(&self, tenant: Tenant) -> Result<Tenant, StorageError>;
    async fn delete(&self, id: TenantId) -> Result<(), StorageError>;
}

#[derive(Default)]
struct InMemoryTenantStore {
    current_id: TenantId,
    tenants: BTreeMap<TenantId, Tenant>,
}

#[derive(Default)]
pub struct InMemoryTenantStorage {
    store: RwLock<InMemoryTenantStore>,
}

impl InMemoryTenantStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantStorage for InMemoryTenantStorage {
    async fn get_all(&self) -> Result<TenantListing, StorageError> {
        let store = self.store.read().await;
        Ok(TenantListing {
            tenants: store.tenants.values().cloned().collect(),
            errors: Vec::new(),
        })
    }

    async fn get(&self, id: TenantId) -> Result<Option<Tenant>, StorageError> {
        let store = self.store.read().await;
        Ok(store.tenants.get(&id).cloned())
    }

    async fn insert(&self, tenant: NewTenant) -> Result<Tenant, StorageError> {
        let mut store = self.store.write().await;
        store.current_id += 1;
        let tenant = tenant.into_tenant(store.current_id);
        store.tenants.insert(tenant.id, tenant.clone());

        log::info!("Inserted tenant {}", tenant.id);
        Ok(tenant)
    }

    async fn update(&self, tenant: Tenant) -> Result<Tenant, StorageError> {
        let mut store = self.store.write().await;
        match store.tenants.get_mut(&tenant.id) {
            Some(existing) => {
                *existing = tenant.clone();
                Ok(tenant)
            }
            None => Err(StorageError::TenantNotFound(tenant.id)),
        }
    }

    async fn delete(&self, id: TenantId) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store
            .tenants
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::TenantNotFound(id))
    }
}

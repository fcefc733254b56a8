mod model;

use async_trait::async_trait;
use eskertu_models::tenant::{NewTenant, Tenant, TenantId};
use model::{TenantStorageModel, format_due_date};

use crate::{StorageError, TenantListing, TenantStorage};

const SELECT_TENANTS: &str = "SELECT id, name, apartment, CAST(payment_date AS TEXT) AS payment_date FROM tenants";

pub struct SqliteTenantStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteTenantStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStorage for SqliteTenantStorage {
    async fn get_all(&self) -> Result<TenantListing, StorageError> {
        let rows = sqlx::query_as::<_, TenantStorageModel>(&format!("{SELECT_TENANTS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        let mut listing = TenantListing::default();
        for row in rows {
            match Tenant::try_from(row) {
                Ok(tenant) => listing.tenants.push(tenant),
                Err(error) => listing.errors.push(error),
            }
        }

        Ok(listing)
    }

    async fn get(&self, id: TenantId) -> Result<Option<Tenant>, StorageError> {
        let row = sqlx::query_as::<_, TenantStorageModel>(&format!("{SELECT_TENANTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Tenant::try_from).transpose()?)
    }

    async fn insert(&self, tenant: NewTenant) -> Result<Tenant, StorageError> {
        let payment_date = format_due_date(tenant.due_date());
        let created = sqlx::query_as::<_, TenantStorageModel>(
            "INSERT INTO tenants (name, apartment, payment_date)
VALUES (?, ?, ?)
RETURNING id, name, apartment, payment_date",
        )
        .bind(tenant.name())
        .bind(tenant.apartment())
        .bind(payment_date)
        .fetch_one(&self.pool)
        .await?;

        log::info!("Inserted tenant {}", created.id);
        Ok(Tenant::try_from(created)?)
    }

    async fn update(&self, tenant: Tenant) -> Result<Tenant, StorageError> {
        let TenantStorageModel {
            id,
            name,
            apartment,
            payment_date,
        } = tenant.into();

        let updated = sqlx::query_as::<_, TenantStorageModel>(
            "
UPDATE tenants
SET name = ?,
    apartment = ?,
    payment_date = ?
WHERE id = ?
RETURNING id, name, apartment, payment_date
",
        )
        .bind(name)
        .bind(apartment)
        .bind(payment_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::TenantNotFound(id))?;

        Ok(Tenant::try_from(updated)?)
    }

    async fn delete(&self, id: TenantId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::TenantNotFound(id));
        }

        Ok(())
    }
}

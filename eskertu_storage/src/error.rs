use eskertu_models::tenant::TenantId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Tenant {0} does not exist")]
    TenantNotFound(TenantId),

    #[error(transparent)]
    Malformed(#[from] TenantReadError),
}

/// A stored tenant row that could not be turned into a [`Tenant`](eskertu_models::tenant::Tenant).
#[derive(Debug, Error)]
#[error("Tenant {id} has unparsable due date {raw:?}")]
pub struct TenantReadError {
    pub id: TenantId,
    pub raw: String,
    #[source]
    pub source: eskertu_models::chrono::ParseError,
}

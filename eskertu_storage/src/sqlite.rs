pub mod subscriber_registry;
pub mod tenant_storage;

pub use sqlx;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::StorageError;

/// Opens a pool for `url` and applies pending migrations.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    migrate(&pool).await?;
    log::info!("Connected to {url}");

    Ok(pool)
}

/// Single-connection in-memory database. Every connection to `sqlite::memory:`
/// opens its own database, so the pool is capped at one.
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    connect("sqlite::memory:", 1).await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

use async_trait::async_trait;
use eskertu_models::subscriber::SubscriberAddress;

use crate::{StorageError, SubscriberRegistry};

pub struct SqliteSubscriberRegistry {
    pool: sqlx::SqlitePool,
}

impl SqliteSubscriberRegistry {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRegistry for SqliteSubscriberRegistry {
    async fn register(&self, address: SubscriberAddress) -> Result<bool, StorageError> {
        let result =
            sqlx::query("INSERT INTO subscribers (chat_id) VALUES (?) ON CONFLICT(chat_id) DO NOTHING")
                .bind(address)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_all(&self) -> Result<Vec<SubscriberAddress>, StorageError> {
        let addresses =
            sqlx::query_scalar::<_, SubscriberAddress>("SELECT chat_id FROM subscribers ORDER BY chat_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(addresses)
    }
}

use std::str::FromStr;

use power_client::{
    db::reading_queries,
    domain::{NewReading, Reading},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use time::Date;
use tokio::sync::Mutex;

use super::{ReadingStore, StoreError};

/// Durable store backed by one SQLite file.
///
/// Holds a long-lived pool. Appends go through `write_lock` so ids are handed
/// out in call order; reads do not take it.
pub struct SqliteStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (creating if absent) the database at `path` and ensure the schema.
    pub async fn open(path: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::info!(path, "opened sqlite reading store");
        Self::with_pool(pool).await
    }

    /// A private in-memory database; gone when the store is dropped.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // Each :memory: connection is a separate database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        reading_queries::create_schema(&pool).await?;
        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait::async_trait]
impl ReadingStore for SqliteStore {
    async fn append(&self, reading: NewReading) -> Result<Reading, StoreError> {
        let _guard = self.write_lock.lock().await;
        let id = reading_queries::insert_reading(&self.pool, &reading).await?;
        Ok(reading.with_id(id))
    }

    async fn recent(&self, n: usize) -> Result<Vec<Reading>, StoreError> {
        Ok(reading_queries::recent_readings(&self.pool, n).await?)
    }

    async fn for_date(&self, date: Date) -> Result<Vec<Reading>, StoreError> {
        Ok(reading_queries::readings_for_date(&self.pool, date).await?)
    }

    async fn all(&self) -> Result<Vec<Reading>, StoreError> {
        Ok(reading_queries::all_readings(&self.pool).await?)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(reading_queries::count_readings(&self.pool).await?)
    }
}

//! Append-only reading log.
//!
//! Two backends satisfy the same contract: a capped in-process ring for
//! throwaway runs, and a SQLite table that survives restarts.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use power_client::domain::{NewReading, Reading};
use time::Date;

use crate::config::{StoreConfig, StoreKind};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<power_client::ClientError> for StoreError {
    fn from(e: power_client::ClientError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    /// Store `reading` under the next sequence id and return the stored row.
    async fn append(&self, reading: NewReading) -> Result<Reading, StoreError>;

    /// The last `n` readings, oldest first.
    async fn recent(&self, n: usize) -> Result<Vec<Reading>, StoreError>;

    /// Every reading captured on `date`, oldest first.
    async fn for_date(&self, date: Date) -> Result<Vec<Reading>, StoreError>;

    /// Every reading held, oldest first.
    async fn all(&self) -> Result<Vec<Reading>, StoreError>;

    async fn len(&self) -> Result<usize, StoreError>;
}

/// The backend chosen by `[store] kind`.
pub enum StoreBackend {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl StoreBackend {
    pub async fn open(cfg: &StoreConfig) -> Result<Self, StoreError> {
        match cfg.kind {
            StoreKind::Memory => Ok(Self::Memory(MemoryStore::new(cfg.memory_capacity))),
            StoreKind::Sqlite => Ok(Self::Sqlite(
                SqliteStore::open(&cfg.path, cfg.max_connections).await?,
            )),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for StoreBackend {
    async fn append(&self, reading: NewReading) -> Result<Reading, StoreError> {
        match self {
            Self::Memory(s) => s.append(reading).await,
            Self::Sqlite(s) => s.append(reading).await,
        }
    }

    async fn recent(&self, n: usize) -> Result<Vec<Reading>, StoreError> {
        match self {
            Self::Memory(s) => s.recent(n).await,
            Self::Sqlite(s) => s.recent(n).await,
        }
    }

    async fn for_date(&self, date: Date) -> Result<Vec<Reading>, StoreError> {
        match self {
            Self::Memory(s) => s.for_date(date).await,
            Self::Sqlite(s) => s.for_date(date).await,
        }
    }

    async fn all(&self) -> Result<Vec<Reading>, StoreError> {
        match self {
            Self::Memory(s) => s.all().await,
            Self::Sqlite(s) => s.all().await,
        }
    }

    async fn len(&self) -> Result<usize, StoreError> {
        match self {
            Self::Memory(s) => s.len().await,
            Self::Sqlite(s) => s.len().await,
        }
    }
}

use std::collections::VecDeque;

use power_client::domain::{NewReading, Reading};
use time::Date;
use tokio::sync::Mutex;

use super::{ReadingStore, StoreError};

struct Inner {
    readings: VecDeque<Reading>,
    next_id: i64,
}

/// Bounded in-process store. Nothing survives a restart.
///
/// Once `capacity` is exceeded the oldest readings are evicted. Ids keep
/// counting up across evictions.
pub struct MemoryStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                readings: VecDeque::with_capacity(capacity),
                next_id: 1,
            }),
        }
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryStore {
    async fn append(&self, reading: NewReading) -> Result<Reading, StoreError> {
        let mut inner = self.inner.lock().await;

        let stored = reading.with_id(inner.next_id);
        inner.next_id += 1;
        inner.readings.push_back(stored.clone());

        while inner.readings.len() > self.capacity {
            inner.readings.pop_front();
        }

        Ok(stored)
    }

    async fn recent(&self, n: usize) -> Result<Vec<Reading>, StoreError> {
        let inner = self.inner.lock().await;
        let skip = inner.readings.len().saturating_sub(n);
        Ok(inner.readings.iter().skip(skip).cloned().collect())
    }

    async fn for_date(&self, date: Date) -> Result<Vec<Reading>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .readings
            .iter()
            .filter(|r| r.ts.date() == date)
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Reading>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.readings.iter().cloned().collect())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.inner.lock().await.readings.len())
    }
}

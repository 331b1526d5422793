/**
 * In-Memory Store
 *
 * A `Store` that keeps records in process memory, grouped by collection URL.
 * It backs the server binary and the test suites. Writes can be made to fail
 * on demand to exercise persistence-failure paths.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::{Store, StoreError};
use crate::shared::Record;

#[derive(Debug, Clone)]
struct StoredRecord {
    url: String,
    key: String,
    record: Record,
}

/// Records kept in memory, keyed by collection URL and identity
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<StoredRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate records for a collection URL
    ///
    /// Records without an identity under `id_attribute` are skipped.
    pub async fn seed(&self, url: &str, id_attribute: &str, records: impl IntoIterator<Item = Record>) {
        let mut entries = self.entries.write().await;
        for record in records {
            let Some(key) = record.identity_key(id_attribute) else {
                tracing::warn!("[MemoryStore] Skipping seed record without identity for {}", url);
                continue;
            };
            entries.retain(|e| !(e.url == url && e.key == key));
            entries.push(StoredRecord {
                url: url.to_string(),
                key,
                record,
            });
        }
    }

    /// Make every subsequent write fail with a persistence error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of records stored under `url`
    pub async fn count(&self, url: &str) -> usize {
        self.entries.read().await.iter().filter(|e| e.url == url).count()
    }

    /// Stored copy of a record
    pub async fn get(&self, url: &str, key: &str) -> Option<Record> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.url == url && e.key == key)
            .map(|e| e.record.clone())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence("store is refusing writes".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch(&self, url: &str) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.url == url)
            .map(|e| e.record.clone())
            .collect())
    }

    async fn create(&self, url: &str, id_attribute: &str, mut record: Record) -> Result<Record, StoreError> {
        self.check_writable()?;

        let key = match record.identity_key(id_attribute) {
            Some(key) => key,
            None => {
                let key = Uuid::new_v4().to_string();
                record.set(id_attribute, serde_json::Value::String(key.clone()));
                key
            }
        };

        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.url == url && e.key == key) {
            return Err(StoreError::Validation(format!("Model {} already exists.", key)));
        }
        entries.push(StoredRecord {
            url: url.to_string(),
            key,
            record: record.clone(),
        });
        Ok(record)
    }

    async fn update(&self, url: &str, id_attribute: &str, record: Record) -> Result<Record, StoreError> {
        self.check_writable()?;

        let key = record
            .identity_key(id_attribute)
            .ok_or_else(|| StoreError::Validation(format!("{} is required", id_attribute)))?;

        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.url == url && e.key == key) {
            Some(entry) => entry.record = record.clone(),
            None => entries.push(StoredRecord {
                url: url.to_string(),
                key,
                record: record.clone(),
            }),
        }
        Ok(record)
    }

    async fn destroy(&self, url: &str, id_attribute: &str, record: &Record) -> Result<(), StoreError> {
        self.check_writable()?;

        let Some(key) = record.identity_key(id_attribute) else {
            return Ok(());
        };
        self.entries
            .write()
            .await
            .retain(|e| !(e.url == url && e.key == key));
        Ok(())
    }
}

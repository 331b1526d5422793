/**
 * Collection
 *
 * A collection is the ordered, in-memory view of the records stored under
 * one URL. It is the only path through which records change, and it emits a
 * `ChangeEvent` for every mutation on a `tokio::sync::broadcast` channel.
 *
 * # Write Ordering
 *
 * Writes go to the store first. Only once the store confirms does the
 * collection update its view and emit the event, so subscribers never see a
 * partial state that was not persisted. Events are sent while the view's
 * write lock is held, which keeps per-record event order identical to
 * mutation order.
 */

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::backend::realtime::broadcast::broadcast_event;
use crate::backend::store::{Store, StoreError};
use crate::shared::{ChangeEvent, Record, DEFAULT_ID_ATTRIBUTE};

/// Validation hook run before every create and update
///
/// The returned message becomes the 422 response message.
pub type Validator = Arc<dyn Fn(&Record) -> Result<(), String> + Send + Sync>;

const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// The records of one URL plus their change notifications
pub struct Collection {
    url: String,
    id_attribute: String,
    records: RwLock<Vec<Record>>,
    store: Arc<dyn Store>,
    validator: Option<Validator>,
    events: broadcast::Sender<ChangeEvent>,
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("url", &self.url)
            .field("id_attribute", &self.id_attribute)
            .field("listeners", &self.events.receiver_count())
            .finish()
    }
}

impl Collection {
    /// Create an empty collection for `url` backed by `store`
    pub fn new(url: impl Into<String>, store: Arc<dyn Store>) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            url: url.into(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            records: RwLock::new(Vec::new()),
            store,
            validator: None,
            events,
        }
    }

    /// Use a different identity attribute (e.g. `_id`)
    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = id_attribute.into();
        self
    }

    /// Install a validator
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Record) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Resize the event channel
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        self.events = events;
        self
    }

    /// Start with these records in memory, without touching the store
    pub fn with_records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.records = RwLock::new(records.into_iter().collect());
        self
    }

    /// Collection URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Identity attribute
    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// Number of records in memory
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the collection holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Replace the in-memory view with the store's records
    ///
    /// Returns the number of records loaded. No events are emitted.
    pub async fn fetch(&self) -> Result<usize, StoreError> {
        let loaded = self.store.fetch(&self.url).await?;
        let count = loaded.len();
        *self.records.write().await = loaded;
        Ok(count)
    }

    /// Look a record up by identity key
    pub async fn get(&self, id: &str) -> Option<Record> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.has_identity(&self.id_attribute, id))
            .cloned()
    }

    /// Serialize every record
    pub async fn to_json(&self) -> Vec<Value> {
        self.records.read().await.iter().map(Record::to_json).collect()
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Number of live event receivers
    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Put a record into the in-memory view without persisting it
    ///
    /// A record with a new identity emits `add`; one replacing an existing
    /// identity with different attributes emits `change`.
    pub async fn add(&self, record: Record) {
        let mut records = self.records.write().await;
        let existing = record
            .identity_key(&self.id_attribute)
            .and_then(|key| records.iter().position(|r| r.has_identity(&self.id_attribute, &key)));

        match existing {
            Some(index) if records[index] == record => {}
            Some(index) => {
                records[index] = record.clone();
                broadcast_event(&self.events, ChangeEvent::change(record));
            }
            None => {
                records.push(record.clone());
                broadcast_event(&self.events, ChangeEvent::add(record));
            }
        }
    }

    /// Validate, persist and add a new record
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` when the validator rejects the record or its
    /// identity is already taken; any store error otherwise.
    pub async fn create(&self, attributes: Map<String, Value>) -> Result<Record, StoreError> {
        let record = Record::from_map(attributes);
        self.validate(&record)?;

        if let Some(key) = record.identity_key(&self.id_attribute) {
            if self.get(&key).await.is_some() {
                return Err(StoreError::Validation(format!("Model {} already exists.", key)));
            }
        }

        let saved = self.store.create(&self.url, &self.id_attribute, record).await?;

        let mut records = self.records.write().await;
        records.push(saved.clone());
        broadcast_event(&self.events, ChangeEvent::add(saved.clone()));
        Ok(saved)
    }

    /// Apply attribute changes to a record and persist them
    ///
    /// The record's identity cannot be changed through `changes`. The `change`
    /// event fires only after the store has confirmed the write.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no record has identity `id`,
    /// `StoreError::Validation` if the validator rejects the merged record.
    pub async fn save(&self, id: &str, changes: &Map<String, Value>) -> Result<Record, StoreError> {
        let current = self
            .get(id)
            .await
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut updated = current.clone();
        updated.merge(changes);
        if let Some(identity) = current.identity(&self.id_attribute) {
            updated.set(self.id_attribute.clone(), identity.clone());
        }
        self.validate(&updated)?;

        let persisted = self.store.update(&self.url, &self.id_attribute, updated).await?;

        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.has_identity(&self.id_attribute, id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        records[index] = persisted.clone();
        broadcast_event(&self.events, ChangeEvent::change(persisted.clone()));
        Ok(persisted)
    }

    /// Take a record out of the in-memory view without touching the store
    pub async fn remove(&self, id: &str) -> Option<Record> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.has_identity(&self.id_attribute, id))?;
        let removed = records.remove(index);
        broadcast_event(&self.events, ChangeEvent::remove(removed.clone()));
        Some(removed)
    }

    /// Delete a record from the store, then from the view
    ///
    /// Emits `destroy` followed by `remove`.
    pub async fn destroy(&self, id: &str) -> Result<Record, StoreError> {
        let record = self
            .get(id)
            .await
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        self.store.destroy(&self.url, &self.id_attribute, &record).await?;

        let mut records = self.records.write().await;
        records.retain(|r| !r.has_identity(&self.id_attribute, id));
        broadcast_event(&self.events, ChangeEvent::destroy(record.clone()));
        broadcast_event(&self.events, ChangeEvent::remove(record.clone()));
        Ok(record)
    }

    fn validate(&self, record: &Record) -> Result<(), StoreError> {
        match &self.validator {
            Some(validator) => validator(record).map_err(StoreError::Validation),
            None => Ok(()),
        }
    }
}

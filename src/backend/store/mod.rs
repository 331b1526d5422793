//! Store Module
//!
//! The persistence seam. A `Store` persists records for a collection URL; a
//! `Collection` keeps the ordered in-memory view of one URL, validates
//! writes, and emits change events once the store has confirmed them.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs        - Store trait and StoreError
//! ├── collection.rs - Collection (in-memory view + change events)
//! └── memory.rs     - In-memory Store implementation
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::Record;

/// Collection with change notifications
pub mod collection;

/// In-memory store
pub mod memory;

pub use collection::{Collection, Validator};
pub use memory::MemoryStore;

/// Store failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record was rejected by validation; the message is shown to clients
    #[error("{0}")]
    Validation(String),

    /// The record does not exist
    #[error("record not found: {0}")]
    NotFound(String),

    /// Any other store failure
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// Persistent storage for collections
///
/// Every call names the collection URL it acts on. Implementations assign an
/// identity on `create` when the record has none.
#[async_trait]
pub trait Store: Send + Sync {
    /// Load every record stored under `url`, in insertion order
    async fn fetch(&self, url: &str) -> Result<Vec<Record>, StoreError>;

    /// Persist a new record and return it as stored
    async fn create(&self, url: &str, id_attribute: &str, record: Record) -> Result<Record, StoreError>;

    /// Persist the full state of an existing record and return it as stored
    async fn update(&self, url: &str, id_attribute: &str, record: Record) -> Result<Record, StoreError>;

    /// Delete a record
    async fn destroy(&self, url: &str, id_attribute: &str, record: &Record) -> Result<(), StoreError>;
}

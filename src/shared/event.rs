/**
 * Collection Change Events
 *
 * This module defines the mutation events a collection emits. Collection-level
 * subscribers see `add`, `change` and `remove`; record-level subscribers see
 * `change` and `destroy`. Destroying a record emits `destroy` followed by
 * `remove`.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::record::Record;

/// Kind of mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A record joined the collection
    Add,
    /// A record's attributes were persisted
    Change,
    /// A record left the collection
    Remove,
    /// A record was destroyed in the store
    Destroy,
}

impl ChangeKind {
    /// Events delivered to a collection subscription
    pub const COLLECTION: [ChangeKind; 3] = [ChangeKind::Add, ChangeKind::Change, ChangeKind::Remove];

    /// Events delivered to a record subscription
    pub const RECORD: [ChangeKind; 2] = [ChangeKind::Change, ChangeKind::Destroy];

    /// SSE event name
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Change => "change",
            ChangeKind::Remove => "remove",
            ChangeKind::Destroy => "destroy",
        }
    }

    /// Whether the record is already gone when this event fires
    pub fn is_departure(&self) -> bool {
        matches!(self, ChangeKind::Remove | ChangeKind::Destroy)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation event carrying the affected record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    /// Kind of mutation
    pub kind: ChangeKind,
    /// Record state after the mutation (last known state for departures)
    pub record: Record,
    /// Timestamp when the event occurred
    pub timestamp: String,
}

impl ChangeEvent {
    /// Create a new change event
    pub fn new(kind: ChangeKind, record: Record) -> Self {
        Self {
            kind,
            record,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an add event
    pub fn add(record: Record) -> Self {
        Self::new(ChangeKind::Add, record)
    }

    /// Create a change event
    pub fn change(record: Record) -> Self {
        Self::new(ChangeKind::Change, record)
    }

    /// Create a remove event
    pub fn remove(record: Record) -> Self {
        Self::new(ChangeKind::Remove, record)
    }

    /// Create a destroy event
    pub fn destroy(record: Record) -> Self {
        Self::new(ChangeKind::Destroy, record)
    }
}

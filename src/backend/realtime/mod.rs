//! Real-time Update Module
//!
//! Streams collection changes to clients over Server-Sent Events, applying
//! each resource's permission policy per event and per subscriber.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - broadcast_event and ChangeBroadcaster
//! ├── subscription.rs - Subscription lifecycle and per-event filtering
//! └── sse.rs          - SSE subscription handlers
//! ```
//!
//! # Event Sets
//!
//! - collection subscriptions receive `add`, `change`, `remove`
//! - record subscriptions receive `change`, `destroy` for their record
//!
//! # Connection Management
//!
//! - A heartbeat comment (`:keepAlive`) is sent every keep-alive interval
//! - Lagged receivers log the number of skipped events and carry on
//! - Disconnecting drops the subscription, which leaves the live table

/// Event broadcasting utilities
pub mod broadcast;

/// Subscription lifecycle
pub mod subscription;

/// Server-Sent Events handlers
pub mod sse;

pub use broadcast::{broadcast_event, ChangeBroadcaster, ChangeEventBroadcast, SubscriptionInfo};
pub use sse::{subscribe_collection, subscribe_record};
pub use subscription::{Frame, PendingSubscription, Subscription, SubscriptionTarget};

/**
 * Change Broadcasting
 *
 * Collections publish their `ChangeEvent`s on a `tokio::sync::broadcast`
 * channel. Every SSE subscriber holds its own receiver on that channel, so
 * each one sees events in the order the collection emitted them.
 *
 * `ChangeBroadcaster` tracks the live subscriptions. It hands out
 * `PendingSubscription`s, and each authorized `Subscription` stays in its
 * live table until the client disconnects.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::permission::RequestContext;
use crate::backend::realtime::subscription::{PendingSubscription, SubscriptionTarget};
use crate::backend::registry::Resource;
use crate::shared::ChangeEvent;

/// Sender side of a collection's change channel
pub type ChangeEventBroadcast = broadcast::Sender<ChangeEvent>;

/// Send a change event to every receiver of a collection
///
/// # Returns
///
/// Number of receivers the event was queued for (0 if nobody listens)
pub fn broadcast_event(broadcast_tx: &ChangeEventBroadcast, event: ChangeEvent) -> usize {
    let kind = event.kind;
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} event broadcast to {} subscribers", kind, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::trace!("[Realtime] No subscribers to receive {} event", kind);
            0
        }
    }
}

/// Entry in the live subscription table
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionInfo {
    pub id: Uuid,
    pub resource: String,
    pub target: SubscriptionTarget,
    pub user: Option<String>,
    pub connected_at: DateTime<Utc>,
}

pub(crate) type ActiveTable = Arc<Mutex<HashMap<Uuid, SubscriptionInfo>>>;

/// Hands out subscriptions and tracks the live ones
#[derive(Debug, Clone)]
pub struct ChangeBroadcaster {
    active: ActiveTable,
    keep_alive: Duration,
}

impl ChangeBroadcaster {
    pub fn new(keep_alive: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(HashMap::new())),
            keep_alive,
        }
    }

    /// Interval between heartbeat comments on every stream
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Start a subscription for `context` on `target` of `resource`
    ///
    /// Nothing is registered until the returned subscription is authorized.
    pub fn connect(
        &self,
        resource: Arc<Resource>,
        target: SubscriptionTarget,
        context: RequestContext,
    ) -> PendingSubscription {
        PendingSubscription::new(self.active.clone(), resource, target, context)
    }

    /// Number of open subscriptions
    pub fn active_subscriptions(&self) -> usize {
        lock(&self.active).len()
    }

    /// Snapshot of the open subscriptions, oldest first
    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        let mut infos: Vec<_> = lock(&self.active).values().cloned().collect();
        infos.sort_by_key(|info| info.connected_at);
        infos
    }
}

/// The table only holds plain data, so a poisoned lock is still usable
pub(crate) fn lock(table: &ActiveTable) -> MutexGuard<'_, HashMap<Uuid, SubscriptionInfo>> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

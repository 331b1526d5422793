/**
 * Subscription Lifecycle
 *
 * A subscription moves through three states, each a distinct type:
 *
 * - `PendingSubscription` (connecting): the request has been routed but the
 *   caller's `read` access has not been checked yet.
 * - `Subscription` (open): access was granted; it holds a receiver on the
 *   collection's change channel and an entry in the live table.
 * - dropped (closed): the transport went away. The `SubscriptionGuard`
 *   removes the live-table entry exactly once.
 *
 * # Per-event permission
 *
 * Access is re-evaluated as `read` for the subscribing caller on every event,
 * against the collection as it is when the event is delivered. A permitted
 * record is sent in full. A `remove` or `destroy` the caller may not see is
 * still sent, reduced to `{"id": <identity>}`, since the record has already
 * left the collection by then.
 */

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::backend::error::ResourceError;
use crate::backend::permission::{PolicyTarget, RequestContext};
use crate::backend::realtime::broadcast::{lock, ActiveTable, SubscriptionInfo};
use crate::backend::registry::Resource;
use crate::shared::{ChangeEvent, ChangeKind};

/// What a subscription listens to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum SubscriptionTarget {
    /// The whole collection: `add`, `change`, `remove`
    Collection,
    /// One record by identity key: `change`, `destroy`
    Record(String),
}

impl SubscriptionTarget {
    pub fn events(&self) -> &'static [ChangeKind] {
        match self {
            Self::Collection => &ChangeKind::COLLECTION,
            Self::Record(_) => &ChangeKind::RECORD,
        }
    }
}

impl fmt::Display for SubscriptionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => f.write_str("collection"),
            Self::Record(id) => write!(f, "record {}", id),
        }
    }
}

/// One SSE frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub event: ChangeKind,
    pub data: Value,
}

/// A subscription whose access has not been checked
pub struct PendingSubscription {
    active: ActiveTable,
    resource: Arc<Resource>,
    target: SubscriptionTarget,
    context: RequestContext,
}

impl PendingSubscription {
    pub(crate) fn new(
        active: ActiveTable,
        resource: Arc<Resource>,
        target: SubscriptionTarget,
        context: RequestContext,
    ) -> Self {
        Self {
            active,
            resource,
            target,
            context,
        }
    }

    pub fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    /// Check `read` access on the target and open the subscription
    ///
    /// # Errors
    ///
    /// `NotFound` when a record target does not exist, `PermissionDenied`
    /// when the policy denies `read`.
    pub async fn authorize(self) -> Result<Subscription, ResourceError> {
        let collection = self.resource.collection();

        // Subscribe before checking so no event slips in between.
        let receiver = collection.subscribe();

        let policy_target = match &self.target {
            SubscriptionTarget::Collection => PolicyTarget::collection(collection.to_json().await),
            SubscriptionTarget::Record(id) => match collection.get(id).await {
                Some(record) => PolicyTarget::record(record.to_json()),
                None => {
                    tracing::warn!(
                        "[Realtime] {}: subscribe to missing record {}",
                        self.resource.name(),
                        id
                    );
                    return Err(ResourceError::record_not_found(id));
                }
            },
        };

        let access = self.resource.resolver().resolve(&self.context, &policy_target, None);
        if access.is_denied() {
            tracing::warn!(
                "[Realtime] {}: subscription to {} denied for user {:?}",
                self.resource.name(),
                self.target,
                self.context.user_id()
            );
            return Err(ResourceError::denied("Permission denied."));
        }

        let id = Uuid::new_v4();
        let info = SubscriptionInfo {
            id,
            resource: self.resource.name().to_string(),
            target: self.target.clone(),
            user: self.context.user_id().map(str::to_string),
            connected_at: Utc::now(),
        };
        lock(&self.active).insert(id, info.clone());

        tracing::debug!(
            "[Realtime] {}: client connect to {} (user {:?})",
            info.resource,
            info.target,
            info.user
        );

        Ok(Subscription {
            guard: SubscriptionGuard {
                active: self.active,
                info,
            },
            resource: self.resource,
            target: self.target,
            context: self.context,
            receiver,
        })
    }
}

/// An open subscription
pub struct Subscription {
    resource: Arc<Resource>,
    target: SubscriptionTarget,
    context: RequestContext,
    receiver: broadcast::Receiver<ChangeEvent>,
    guard: SubscriptionGuard,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.guard.info.id)
            .field("resource", &self.resource.name())
            .field("target", &self.target)
            .finish()
    }
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.guard.info.id
    }

    pub fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    /// Wait for the next frame this caller may receive
    ///
    /// Returns `None` once the collection's channel is closed.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(frame) = self.frame_for(event).await {
                        return Some(frame);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "[Realtime] {}: subscriber {} lagged, skipped {} events",
                        self.resource.name(),
                        self.id(),
                        skipped
                    );
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("[Realtime] {}: change channel closed", self.resource.name());
                    return None;
                }
            }
        }
    }

    async fn frame_for(&self, event: ChangeEvent) -> Option<Frame> {
        if !self.target.events().contains(&event.kind) {
            return None;
        }

        let id_attribute = self.resource.id_attribute();
        if let SubscriptionTarget::Record(id) = &self.target {
            if !event.record.has_identity(id_attribute, id) {
                return None;
            }
        }

        let collection = PolicyTarget::collection(self.resource.collection().to_json().await);
        let access = self.resource.resolver().resolve(&self.context, &collection, None);
        let record = event.record.to_json();

        tracing::debug!(
            "[Realtime] {}: send {} for {:?} to user {:?}",
            self.resource.name(),
            event.kind,
            event.record.identity_key(id_attribute),
            self.context.user_id()
        );

        if access.permits(&record, id_attribute) {
            Some(Frame {
                event: event.kind,
                data: record,
            })
        } else if event.kind.is_departure() {
            let identity = event.record.identity(id_attribute).cloned().unwrap_or(Value::Null);
            Some(Frame {
                event: event.kind,
                data: json!({ "id": identity }),
            })
        } else {
            None
        }
    }
}

/// Removes a subscription from the live table when dropped
struct SubscriptionGuard {
    active: ActiveTable,
    info: SubscriptionInfo,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if lock(&self.active).remove(&self.info.id).is_some() {
            let connected = Utc::now() - self.info.connected_at;
            tracing::debug!(
                "[Realtime] {}: client disconnect from {} after {}ms (user {:?})",
                self.info.resource,
                self.info.target,
                connected.num_milliseconds(),
                self.info.user
            );
        }
    }
}

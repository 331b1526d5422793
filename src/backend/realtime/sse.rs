/**
 * SSE Subscription Handlers
 *
 * `GET /<collection>/subscribe` and `GET /<collection>/{id}/subscribe`.
 *
 * Each handler resolves the resource owning the request path, authorizes a
 * subscription for the caller, and streams its frames:
 *
 * ```http
 * event: add
 * data: {"id":1,"value":"added"}
 *
 * :keepAlive
 * ```
 *
 * The heartbeat comment is sent every `keep_alive` interval by axum's
 * `KeepAlive`. When the client disconnects axum drops the stream, which drops
 * the `Subscription` and its guard.
 */

use axum::{
    extract::{OriginalUri, Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use std::sync::Arc;
use tokio_stream::Stream;

use crate::backend::error::ResourceError;
use crate::backend::middleware::CurrentUser;
use crate::backend::permission::RequestContext;
use crate::backend::realtime::subscription::{Subscription, SubscriptionTarget};
use crate::backend::registry::Resource;
use crate::backend::server::state::AppState;

/// Handle a collection subscription (GET /<collection>/subscribe)
pub async fn subscribe_collection(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ResourceError> {
    let resource = resolve(&app_state, uri.path())?;
    let context = RequestContext::for_subscriber(user, uri.path());
    open(&app_state, resource, SubscriptionTarget::Collection, context).await
}

/// Handle a record subscription (GET /<collection>/{id}/subscribe)
pub async fn subscribe_record(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ResourceError> {
    let resource = resolve(&app_state, uri.path())?;
    let context = RequestContext::for_subscriber(user, uri.path());
    open(&app_state, resource, SubscriptionTarget::Record(id), context).await
}

fn resolve(app_state: &AppState, path: &str) -> Result<Arc<Resource>, ResourceError> {
    app_state.registry.resolve(path).ok_or_else(|| {
        tracing::warn!("[Realtime] Subscription to {} has no resource", path);
        ResourceError::denied("Permission denied.")
    })
}

async fn open(
    app_state: &AppState,
    resource: Arc<Resource>,
    target: SubscriptionTarget,
    context: RequestContext,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ResourceError> {
    let subscription = app_state
        .broadcaster
        .connect(resource, target, context)
        .authorize()
        .await?;

    let keep_alive = KeepAlive::new()
        .interval(app_state.broadcaster.keep_alive())
        .text("keepAlive");

    Ok(Sse::new(frames(subscription)).keep_alive(keep_alive))
}

/// Stream of SSE events for an open subscription
pub fn frames(subscription: Subscription) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(subscription, |mut subscription| async move {
        let frame = subscription.next_frame().await?;
        let event = Event::default()
            .event(frame.event.as_str())
            .data(frame.data.to_string());
        Some((Ok(event), subscription))
    })
}

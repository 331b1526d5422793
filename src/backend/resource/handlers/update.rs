use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    Json,
};
use bytes::Bytes;
use serde_json::Value;

use crate::backend::error::ResourceError;
use crate::backend::middleware::CurrentUser;
use crate::backend::permission::{PolicyTarget, RequestContext};
use crate::backend::resource::handlers::{parse_body, resolve_resource};
use crate::backend::server::state::AppState;

/// Update a record (PUT /<collection>/{id})
///
/// The permission gate runs before the existence check: a missing record is
/// judged against the collection, so a caller without `update` access gets
/// 403 rather than learning whether the record exists.
pub async fn update_record(
    State(app_state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ResourceError> {
    let resource = resolve_resource(&app_state, uri.path())?;
    let context = RequestContext::new(method, user, uri.path());
    let changes = parse_body(&body)?;
    let body_value = Value::Object(changes.clone());

    let collection = resource.collection();
    let existing = collection.get(&id).await;
    let target = match &existing {
        Some(record) => PolicyTarget::record(record.to_json()),
        None => PolicyTarget::collection(collection.to_json().await),
    };

    if resource.resolver().resolve(&context, &target, Some(&body_value)).is_denied() {
        tracing::warn!(
            "[Resource] update: {}: permission denied on {} for user {:?}",
            resource.name(),
            id,
            context.user_id()
        );
        return Err(ResourceError::denied("Permission denied."));
    }

    if existing.is_none() {
        tracing::error!("[Resource] update: {}: Model {} does not exist.", resource.name(), id);
        return Err(ResourceError::record_not_found(&id));
    }

    let saved = collection.save(&id, &changes).await.map_err(|e| {
        tracing::error!("[Resource] update: {}: {}: {}", resource.name(), id, e);
        ResourceError::from_store("update", e)
    })?;

    tracing::info!("[Resource] update: {}: {}", resource.name(), id);
    Ok((
        StatusCode::PARTIAL_CONTENT,
        Json(Value::Object(saved.reserved(resource.id_attribute()))),
    ))
}

use axum::{
    extract::{OriginalUri, State},
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

/// Create a record (POST /<collection>)
///
/// Responds 206 with the record's reserved attributes (the identity and any
/// attribute whose name starts with `_`).
pub async fn create_record(
    State(app_state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ResourceError> {
    let resource = resolve_resource(&app_state, uri.path())?;
    let context = RequestContext::new(method, user, uri.path());
    let attributes = parse_body(&body)?;
    let body_value = Value::Object(attributes.clone());

    let collection = resource.collection();
    let target = PolicyTarget::collection(collection.to_json().await);
    if resource.resolver().resolve(&context, &target, Some(&body_value)).is_denied() {
        tracing::warn!(
            "[Resource] create: {}: permission denied for user {:?}",
            resource.name(),
            context.user_id()
        );
        return Err(ResourceError::denied("Permission denied."));
    }

    let record = collection.create(attributes).await.map_err(|e| {
        tracing::error!("[Resource] create: {}: {}", resource.name(), e);
        ResourceError::from_store("create", e)
    })?;

    let id_attribute = resource.id_attribute();
    tracing::info!(
        "[Resource] create: {}: {:?}",
        resource.name(),
        record.identity_key(id_attribute)
    );
    Ok((
        StatusCode::PARTIAL_CONTENT,
        Json(Value::Object(record.reserved(id_attribute))),
    ))
}

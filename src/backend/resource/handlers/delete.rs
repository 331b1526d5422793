use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
};

use crate::backend::error::ResourceError;
use crate::backend::middleware::CurrentUser;
use crate::backend::permission::{PolicyTarget, RequestContext};
use crate::backend::resource::handlers::resolve_resource;
use crate::backend::server::state::AppState;

/// Delete a record (DELETE /<collection>/{id})
pub async fn delete_record(
    State(app_state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ResourceError> {
    let resource = resolve_resource(&app_state, uri.path())?;
    let context = RequestContext::new(method, user, uri.path());

    let collection = resource.collection();
    let existing = collection.get(&id).await;
    let target = match &existing {
        Some(record) => PolicyTarget::record(record.to_json()),
        None => PolicyTarget::collection(collection.to_json().await),
    };

    if resource.resolver().resolve(&context, &target, None).is_denied() {
        tracing::warn!(
            "[Resource] delete: {}: permission denied on {} for user {:?}",
            resource.name(),
            id,
            context.user_id()
        );
        return Err(ResourceError::denied("Permission denied."));
    }

    if existing.is_none() {
        tracing::warn!("[Resource] delete: {}: Model {} does not exist.", resource.name(), id);
        return Err(ResourceError::record_not_found(&id));
    }

    collection.destroy(&id).await.map_err(|e| {
        tracing::error!("[Resource] delete: {}: {}: {}", resource.name(), id, e);
        ResourceError::from_store("delete", e)
    })?;

    tracing::info!("[Resource] delete: {}: {}", resource.name(), id);
    Ok(StatusCode::NO_CONTENT)
}

/**
 * Read Handlers
 *
 * Permission for a read is always resolved against the whole collection
 * first. A `Filtered` result is then the only pool of records the caller may
 * see: a list returns exactly that pool, and a single-record read is refused
 * for a record outside it.
 */

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::Method,
    Json,
};
use serde_json::Value;

use crate::backend::error::ResourceError;
use crate::backend::middleware::CurrentUser;
use crate::backend::permission::{Access, PolicyTarget, RequestContext};
use crate::backend::registry::Resource;
use crate::backend::resource::handlers::resolve_resource;
use crate::backend::resource::query::ReadQuery;
use crate::backend::server::state::AppState;

/// Resolve collection-level read access, refusing a denial
async fn read_access(resource: &Resource, context: &RequestContext) -> Result<(Access, Vec<Value>), ResourceError> {
    let records = resource.collection().to_json().await;
    let access = resource
        .resolver()
        .resolve(context, &PolicyTarget::collection(records.clone()), None);

    if access.is_denied() {
        tracing::warn!(
            "[Resource] read: {}: permission denied for user {:?}",
            resource.name(),
            context.user_id()
        );
        return Err(ResourceError::denied(format!("No permission for {}", resource.name())));
    }
    Ok((access, records))
}

/// List a collection (GET /<collection>)
pub async fn list_records(
    State(app_state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ReadQuery>,
) -> Result<Json<Value>, ResourceError> {
    let resource = resolve_resource(&app_state, uri.path())?;
    let context = RequestContext::new(method, user, uri.path());

    let (access, records) = read_access(&resource, &context).await?;
    let permitted = match access {
        Access::Filtered(set) => set,
        _ => records,
    };

    let visible = resource.filter(&context, permitted);
    let response = query.apply(visible);

    tracing::debug!("[Resource] read: {}: {} records", resource.name(), response.len());
    Ok(Json(Value::Array(response)))
}

/// Read one record (GET /<collection>/{id})
pub async fn read_record(
    State(app_state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<ReadQuery>,
) -> Result<Json<Value>, ResourceError> {
    let resource = resolve_resource(&app_state, uri.path())?;
    let context = RequestContext::new(method, user, uri.path());

    let (access, _) = read_access(&resource, &context).await?;

    let Some(record) = resource.collection().get(&id).await else {
        tracing::warn!("[Resource] read: {}: Model {} does not exist.", resource.name(), id);
        return Err(ResourceError::record_not_found(&id));
    };

    let record = record.to_json();
    if !access.permits(&record, resource.id_attribute()) {
        tracing::warn!(
            "[Resource] read: {}: record {} requested outside the permitted set by user {:?}",
            resource.name(),
            id,
            context.user_id()
        );
        return Err(ResourceError::denied(format!("No permission for {}", id)));
    }

    let picked = resource.pick(&context, record);
    Ok(Json(query.project(picked)))
}

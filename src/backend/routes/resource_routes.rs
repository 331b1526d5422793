/**
 * Resource Routes
 *
 * Installs the routes of every registered resource whose routes are
 * assigned. For a resource at `/coll`:
 *
 * - `GET /coll/subscribe` - collection SSE stream
 * - `GET /coll/{id}/subscribe` - record SSE stream
 * - `GET /coll`, `GET /coll/` - list
 * - `POST /coll`, `POST /coll/` - create
 * - `GET /coll/{id}` - read one
 * - `PUT /coll/{id}` - update
 * - `DELETE /coll/{id}` - delete
 *
 * Static segments take precedence over `{id}` in Axum's matcher, so
 * `/coll/subscribe` is never read as a record id.
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::realtime::{subscribe_collection, subscribe_record};
use crate::backend::registry::{names::normalize, CollectionRegistry};
use crate::backend::resource::{create_record, delete_record, list_records, read_record, update_record};
use crate::backend::server::state::AppState;

/// Add routes for every resource with routes assigned
pub fn configure_resource_routes(router: Router<AppState>, registry: &CollectionRegistry) -> Router<AppState> {
    registry
        .resources()
        .filter(|resource| resource.assign_routes())
        .fold(router, |router, resource| {
            let base = normalize(resource.url());
            tracing::debug!("[Routes] Mounting resource '{}' at {}", resource.name(), base);

            router
                .route(&format!("{}/subscribe", base), get(subscribe_collection))
                .route(&format!("{}/{{id}}/subscribe", base), get(subscribe_record))
                .route(&base, get(list_records).post(create_record))
                .route(&format!("{}/", base), get(list_records).post(create_record))
                .route(
                    &format!("{}/{{id}}", base),
                    get(read_record).put(update_record).delete(delete_record),
                )
        })
}

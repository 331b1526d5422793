/**
 * Router Configuration
 *
 * Combines every route into a single Axum router.
 *
 * # Layers
 *
 * 1. Resource routes for each registered resource
 * 2. Identity middleware, attaching the forwarded caller identity
 * 3. `TraceLayer` for request tracing
 * 4. JSON 404 fallback for unknown paths
 */

use axum::{middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;

use crate::backend::error::ResourceError;
use crate::backend::middleware::identity_middleware;
use crate::backend::routes::resource_routes::configure_resource_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_resource_routes(Router::new(), &app_state.registry);

    router
        .fallback(|| async { ResourceError::not_found("Not Found") })
        .layer(from_fn_with_state(app_state.clone(), identity_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

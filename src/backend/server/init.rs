/**
 * Server Initialization
 *
 * Builds the registry from configuration and assembles the Axum app.
 *
 * # Initialization Process
 *
 * 1. Create one `Collection` per configured resource over the given store
 * 2. Register each collection (this fetches the ones that start empty)
 * 3. Create the `AppState`
 * 4. Create the router for every resource with routes assigned
 */

use axum::Router;
use regex::Regex;
use std::sync::Arc;

use crate::backend::permission::PermissionPolicy;
use crate::backend::registry::{CollectionRegistry, RegistryError, ResourceOptions};
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::store::{Collection, Store};
use crate::shared::{ResourceConfig, ServerConfig};

/// Options for one configured resource
fn resource_options(resource: &ResourceConfig) -> Result<ResourceOptions, RegistryError> {
    let mut options = ResourceOptions::new();

    if let Some(pattern) = &resource.name_regex {
        let regex = Regex::new(pattern)
            .map_err(|e| RegistryError::configuration(&resource.url, format!("invalid name regex: {}", e)))?;
        options = options.name_regex(regex);
    }

    if let Some(names) = &resource.permissions {
        let policy = PermissionPolicy::from_names(names)
            .map_err(|e| RegistryError::configuration(&resource.url, e.to_string()))?;
        options = options.permissions(policy);
    }

    if !resource.assign_routes {
        options = options.without_routes();
    }

    Ok(options)
}

/// Register every configured resource over `store`
///
/// # Errors
///
/// The first registration failure; startup should abort on it.
pub async fn build_registry(
    config: &ServerConfig,
    store: Arc<dyn Store>,
) -> Result<CollectionRegistry, RegistryError> {
    let mut registry = CollectionRegistry::new();

    for resource in &config.resources {
        let mut collection =
            Collection::new(resource.url.clone(), store.clone()).with_channel_capacity(config.channel_capacity);
        if let Some(id_attribute) = &resource.id_attribute {
            collection = collection.with_id_attribute(id_attribute.clone());
        }

        let options = resource_options(resource)?;
        registry.register(Arc::new(collection), options).await?;
    }

    tracing::info!("Registered {} resources", registry.len());
    Ok(registry)
}

/// Create the Axum application for a populated registry
pub fn create_app(registry: CollectionRegistry, config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing restfeed server");
    let app_state = AppState::new(registry, config);
    create_router(app_state)
}

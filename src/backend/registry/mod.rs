//! Registry Module
//!
//! Owns every registered resource and resolves request paths to them.
//!
//! # Module Structure
//!
//! ```text
//! registry/
//! ├── mod.rs      - CollectionRegistry and RegistryError
//! ├── names.rs    - NameRegistry (URL -> name resolution)
//! └── resource.rs - Resource and ResourceOptions
//! ```
//!
//! # Registration
//!
//! Registration happens before the router is built and is the only time the
//! registry mutates; the server then shares it read-only behind an `Arc`.
//!
//! - Registering the same URL again replaces the earlier resource.
//! - Registering a different URL under a name already in use fails with
//!   `RegistryError::DuplicateName`.
//! - A collection that is empty at registration is fetched from its store.
//!   A failed fetch is logged and the resource is still registered.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::store::Collection;

pub mod names;
pub mod resource;

pub use names::{derive_name, NameRegistry};
pub use resource::{FilterFn, PickFn, Resource, ResourceOptions};

/// Registration failures; these abort startup
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid resource configuration for {url}: {message}")]
    Configuration { url: String, message: String },

    #[error("resource name '{name}' is already used by {existing_url}, cannot register {url}")]
    DuplicateName {
        name: String,
        url: String,
        existing_url: String,
    },
}

impl RegistryError {
    pub fn configuration(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Resources by name, in registration order
#[derive(Debug, Default)]
pub struct CollectionRegistry {
    names: NameRegistry,
    resources: HashMap<String, Arc<Resource>>,
    order: Vec<String>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection as a resource
    ///
    /// # Errors
    ///
    /// `Configuration` when the URL is the root path or `name_regex` does
    /// not yield a name, `DuplicateName` when another URL already owns the
    /// name.
    pub async fn register(
        &mut self,
        collection: Arc<Collection>,
        options: ResourceOptions,
    ) -> Result<Arc<Resource>, RegistryError> {
        let url = names::normalize(collection.url());
        if url == "/" {
            tracing::error!("[Registry] Refusing to register a collection at the root path");
            return Err(RegistryError::configuration(&url, "a collection cannot be mounted at '/'"));
        }
        let name = derive_name(&url, options.name_regex.as_ref()).filter(|n| !n.is_empty()).ok_or_else(|| {
            let regex = options.name_regex.as_ref().map(|r| r.as_str()).unwrap_or_default();
            tracing::error!("[Registry] Cannot match name for {} with {}", url, regex);
            RegistryError::configuration(&url, format!("name regex '{}' has no capture group 1 match", regex))
        })?;

        if let Some(existing) = self.resources.get(&name) {
            if names::normalize(existing.url()) != url {
                return Err(RegistryError::DuplicateName {
                    name,
                    url,
                    existing_url: existing.url().to_string(),
                });
            }
        }

        if let Some(previous) = self.names.remove(&url) {
            tracing::warn!("[Registry] Replacing resource '{}' registered at {}", previous, url);
            self.resources.remove(&previous);
            self.order.retain(|n| n != &previous);
        }

        if collection.is_empty().await {
            match collection.fetch().await {
                Ok(count) => tracing::info!("[Registry] Found {} records for {}", count, url),
                Err(e) => tracing::error!("[Registry] Fetch failed for {}: {}", url, e),
            }
        } else {
            tracing::info!(
                "[Registry] Found {} preexisting records for {}, not fetching",
                collection.len().await,
                url
            );
        }

        let resource = Arc::new(Resource::new(name.clone(), collection, options));
        self.names.insert(&url, name.clone());
        self.resources.insert(name.clone(), resource.clone());
        self.order.push(name.clone());

        tracing::info!("[Registry] Registered resource '{}' at {}", name, url);
        Ok(resource)
    }

    /// Resource owning a request path
    pub fn resolve(&self, path: &str) -> Option<Arc<Resource>> {
        let name = self.names.resolve(path)?;
        self.resources.get(name).cloned()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Resource>> {
        self.resources.get(name).cloned()
    }

    /// Resources in registration order
    pub fn resources(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.order.iter().filter_map(|name| self.resources.get(name))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

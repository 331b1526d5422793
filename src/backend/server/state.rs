/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler:
 *
 * - the collection registry (read-only once the router is built)
 * - the change broadcaster tracking live SSE subscriptions
 * - the server configuration
 */

use std::sync::Arc;

use crate::backend::realtime::ChangeBroadcaster;
use crate::backend::registry::CollectionRegistry;
use crate::shared::ServerConfig;

/// Shared state for all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Registered resources and the URL -> name map
    pub registry: Arc<CollectionRegistry>,

    /// Live SSE subscriptions and heartbeat interval
    pub broadcaster: ChangeBroadcaster,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(registry: CollectionRegistry, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            broadcaster: ChangeBroadcaster::new(config.keep_alive()),
            config: Arc::new(config),
        }
    }
}

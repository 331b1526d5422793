//! Backend Module
//!
//! Server-side code: an Axum HTTP server that exposes registered collections
//! as REST resources and as live Server-Sent-Events feeds, enforcing each
//! resource's permission policy on both.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`store`** - `Store` trait, in-memory store, `Collection` with change events
//! - **`permission`** - Permission policies and the resolver
//! - **`registry`** - Resource registration and path -> resource resolution
//! - **`resource`** - CRUD handlers and read query parameters
//! - **`realtime`** - SSE subscriptions with per-event permission checks
//! - **`middleware`** - Caller identity
//! - **`server`** - State, configuration loading, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`error`** - Request error types and their HTTP responses
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── store/          - Persistence seam and collections
//! ├── permission/     - Policies, contexts, resolver
//! ├── registry/       - Resource registry
//! ├── resource/       - CRUD handlers
//! ├── realtime/       - Change broadcasting and SSE
//! ├── middleware/     - Identity middleware
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! inbound request -> registry resolves the resource -> resolver authorizes
//! -> handler executes or rejects -> response.
//!
//! Independently: collection mutation -> broadcast channel -> each
//! subscription re-checks `read` as its caller -> permitted frame.
//!
//! # Thread Safety
//!
//! - Collections guard their records with `tokio::sync::RwLock`
//! - Change events travel on `tokio::sync::broadcast` channels
//! - The registry is immutable once the router is built

/// Persistence seam and collections
#[cfg(feature = "ssr")]
pub mod store;

/// Permission policies
#[cfg(feature = "ssr")]
pub mod permission;

/// Resource registry
#[cfg(feature = "ssr")]
pub mod registry;

/// CRUD handlers
#[cfg(feature = "ssr")]
pub mod resource;

/// Real-time update system
#[cfg(feature = "ssr")]
pub mod realtime;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use error::ResourceError;
#[cfg(feature = "ssr")]
pub use permission::{Access, Operation, PermissionPolicy, PermissionResolver, RequestContext, Verdict};
#[cfg(feature = "ssr")]
pub use realtime::ChangeBroadcaster;
#[cfg(feature = "ssr")]
pub use registry::{CollectionRegistry, RegistryError, Resource, ResourceOptions};
#[cfg(feature = "ssr")]
pub use server::{build_registry, create_app, AppState};
#[cfg(feature = "ssr")]
pub use store::{Collection, MemoryStore, Store, StoreError};

//! restfeed - REST resources with live, permission-filtered change feeds
//!
//! restfeed exposes data collections as REST resources and as
//! Server-Sent-Events streams. Every resource carries a permission policy
//! that is enforced on each request and re-evaluated, per subscriber, on
//! every change event pushed over SSE.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no server dependency
//!   - Records and identity keys
//!   - Change events
//!   - Configuration
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Store seam and collections
//!   - Permission resolver
//!   - CRUD handlers and SSE broadcaster
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the Axum server in `backend`
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use restfeed::backend::{CollectionRegistry, Collection, MemoryStore, ResourceOptions};
//! use restfeed::backend::{Operation, PermissionPolicy};
//! use restfeed::backend::server::create_app;
//! use restfeed::shared::ServerConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let mut registry = CollectionRegistry::new();
//! registry
//!     .register(
//!         Arc::new(Collection::new("/widgets", store)),
//!         ResourceOptions::new().permissions(PermissionPolicy::allow([Operation::Read])),
//!     )
//!     .await?;
//!
//! let app = create_app(registry, ServerConfig::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

//! Route Configuration Module
//!
//! Configures the HTTP routes for every registered resource.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation and layers
//! └── resource_routes.rs - Per-resource REST and SSE routes
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use restfeed::backend::registry::CollectionRegistry;
//! use restfeed::backend::routes::create_router;
//! use restfeed::backend::server::AppState;
//! use restfeed::shared::ServerConfig;
//!
//! let app_state = AppState::new(CollectionRegistry::new(), ServerConfig::default());
//! let router = create_router(app_state);
//! ```

/// Main router creation
pub mod router;

/// Per-resource routes
pub mod resource_routes;

pub use resource_routes::configure_resource_routes;
pub use router::create_router;

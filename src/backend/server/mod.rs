//! Server Module
//!
//! Initializes and configures the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState
//! ├── config.rs - Configuration loading (file + environment)
//! └── init.rs   - Registry construction and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `load_config` reads the TOML file and
//!    environment overrides
//! 2. **Registry**: `build_registry` registers each configured resource
//! 3. **Router Creation**: `create_app` builds the state and routes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use restfeed::backend::server::{build_registry, create_app, load_config};
//! use restfeed::backend::store::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let registry = build_registry(&config, Arc::new(MemoryStore::new())).await?;
//! let app = create_app(registry, config);
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::load_config;
pub use init::{build_registry, create_app};
pub use state::AppState;

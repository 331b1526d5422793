//! Backend Error Module
//!
//! Error types for resource requests and their conversion to HTTP
//! responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Configuration-time failures are not request errors: see
//! `registry::RegistryError` and `shared::ConfigError`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::ResourceError;
pub use conversion::error_body;

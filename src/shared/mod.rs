//! Shared Module
//!
//! This module contains the data types shared by the store layer, the HTTP
//! handlers and the event broadcaster. None of it depends on the server
//! stack, so it compiles without the `ssr` feature.
//!
//! # Overview
//!
//! - **`record`** - Records, identity keys, reserved attributes
//! - **`event`** - Collection change events
//! - **`error`** - Record-level error types
//! - **`config`** - Server configuration

/// Record data structure
pub mod record;

/// Collection change events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use record::{identity_key, Record, DEFAULT_ID_ATTRIBUTE};
pub use event::{ChangeEvent, ChangeKind};
pub use error::SharedError;
pub use config::{ConfigError, ResourceConfig, ServerConfig, ServerConfigBuilder};

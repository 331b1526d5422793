//! Shared Error Types
//!
//! This module defines error types for the data shapes shared between the
//! store layer and the HTTP layer. They describe problems with the records
//! themselves, independent of how the records are served.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Record shape failures (e.g. attributes that are not an object)
//!
//! # Usage
//!
//! ```rust
//! use restfeed::shared::error::SharedError;
//!
//! let error = SharedError::validation("attributes", "record attributes must be a JSON object");
//! assert!(error.to_string().contains("attributes"));
//! ```
use thiserror::Error;

/// Shared error types for record handling
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Record shape error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The bare message, without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::SerializationError { message } => message,
            Self::ValidationError { message, .. } => message,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/**
 * Resource Error Types
 *
 * This module defines the errors a resource request can end in. Every
 * variant maps to one HTTP status and is converted to a JSON response at the
 * handler boundary, so no per-request failure escapes as a fault.
 *
 * # Error Categories
 *
 * - `PermissionDenied` (403) - the policy refused the operation
 * - `NotFound` (404) - the addressed record does not exist
 * - `ValidationFailed` (422) - the store rejected the attributes
 * - `PersistenceFailure` (500) - the store failed for another reason
 * - `BadRequest` (400) - the body was not valid JSON
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Errors returned by resource handlers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The permission policy denied the request
    #[error("{message}")]
    PermissionDenied {
        /// Human-readable error message
        message: String,
    },

    /// The addressed record does not exist
    #[error("{message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// The store's validation rejected the attributes
    ///
    /// The message is the validator's, verbatim.
    #[error("{message}")]
    ValidationFailed {
        /// Validator message
        message: String,
    },

    /// The store failed for a reason unrelated to validation
    #[error("{message}")]
    PersistenceFailure {
        /// Human-readable error message
        message: String,
    },

    /// The request body could not be parsed
    #[error("{message}")]
    BadRequest {
        /// Human-readable error message
        message: String,
    },
}

impl ResourceError {
    /// Create a permission denied error
    pub fn denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a not found error for a record id
    pub fn record_not_found(id: &str) -> Self {
        Self::NotFound {
            message: format!("Model {} does not exist.", id),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceFailure {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Map a store failure for `operation` ("create", "update", "delete")
    ///
    /// Validation messages pass through; other failures are reported with a
    /// generic message so store internals stay server-side.
    pub fn from_store(operation: &str, err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => Self::validation(message),
            StoreError::NotFound(id) => Self::record_not_found(&id),
            StoreError::Persistence(_) => Self::persistence(format!("{} error", operation)),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::PermissionDenied { message }
            | Self::NotFound { message }
            | Self::ValidationFailed { message }
            | Self::PersistenceFailure { message }
            | Self::BadRequest { message } => message,
        }
    }
}

/// A request body that fails to parse or is not a record is a bad request
impl From<SharedError> for ResourceError {
    fn from(err: SharedError) -> Self {
        Self::bad_request(err.detail())
    }
}

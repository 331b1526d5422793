/**
 * Permission Context
 *
 * What a policy sees about the request it is judging: the method and its
 * canonical operation, the caller (if any), the path, and the serialized
 * target the operation acts on.
 */

use axum::http::Method;
use serde_json::Value;

use crate::backend::middleware::AuthenticatedUser;
use crate::backend::permission::Operation;

/// The request a policy is evaluated for
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// `None` for methods outside the operation map
    pub operation: Option<Operation>,
    pub user: Option<AuthenticatedUser>,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: Method, user: Option<AuthenticatedUser>, path: impl Into<String>) -> Self {
        Self {
            operation: Operation::from_method(&method),
            method,
            user,
            path: path.into(),
        }
    }

    /// Context used to re-check a subscriber's `read` access for each event
    pub fn for_subscriber(user: Option<AuthenticatedUser>, path: impl Into<String>) -> Self {
        Self::new(Method::GET, user, path)
    }

    /// Id of the caller, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// What the operation acts on, serialized for the policy
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyTarget {
    /// Every record of the collection, as a JSON array
    Collection(Value),
    /// A single record
    Record(Value),
}

impl PolicyTarget {
    pub fn collection(records: Vec<Value>) -> Self {
        Self::Collection(Value::Array(records))
    }

    pub fn record(record: Value) -> Self {
        Self::Record(record)
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Collection(value) | Self::Record(value) => value,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }
}

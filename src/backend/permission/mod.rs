//! Permission Module
//!
//! Per-operation, per-record access control for resources.
//!
//! A resource carries one `PermissionPolicy`. For every request (and for every
//! change event delivered to an SSE subscriber) the `PermissionResolver`
//! evaluates that policy against a `RequestContext`, the serialized target
//! (the whole collection or one record) and the request body, producing an
//! `Access`:
//!
//! - `Granted` - the operation may proceed on anything
//! - `Denied` - the operation is refused (403)
//! - `Filtered(records)` - reads see only the listed records
//!
//! # Module Structure
//!
//! ```text
//! permission/
//! ├── mod.rs      - Operation and module exports
//! ├── context.rs  - RequestContext and PolicyTarget
//! ├── policy.rs   - PermissionPolicy, Verdict, Access
//! └── resolver.rs - PermissionResolver
//! ```
//!
//! # Operations
//!
//! HTTP methods map onto four canonical operations:
//!
//! | Method | Operation |
//! |--------|-----------|
//! | POST   | `create`  |
//! | GET    | `read`    |
//! | PUT    | `update`  |
//! | DELETE | `del`     |
//!
//! Any other method has no operation and is denied by every policy except
//! `Open`.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod context;
pub mod policy;
pub mod resolver;

pub use context::{PolicyTarget, RequestContext};
pub use policy::{Access, PermissionPolicy, PolicyFn, Predicate, PredicateInput, Verdict};
pub use resolver::PermissionResolver;

/// Canonical resource operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Del,
}

impl Operation {
    /// Operation for an HTTP method, if it has one
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::POST => Some(Self::Create),
            Method::GET => Some(Self::Read),
            Method::PUT => Some(Self::Update),
            Method::DELETE => Some(Self::Del),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Del => "del",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation name that is not one of `create`, `read`, `update`, `del`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown operation '{0}' (expected create, read, update or del)")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "del" => Ok(Self::Del),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

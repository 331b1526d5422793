//! CRUD Handlers
//!
//! One handler per resource operation. Every handler resolves the resource
//! that owns the request path through the registry, builds a
//! `RequestContext` for the caller, and consults the resource's permission
//! resolver before touching the collection.
//!
//! | Handler         | Route                  | Success |
//! |-----------------|------------------------|---------|
//! | `list_records`  | `GET /coll`            | 200     |
//! | `read_record`   | `GET /coll/{id}`       | 200     |
//! | `create_record` | `POST /coll`           | 206     |
//! | `update_record` | `PUT /coll/{id}`       | 206     |
//! | `delete_record` | `DELETE /coll/{id}`    | 204     |

use bytes::Bytes;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::backend::error::ResourceError;
use crate::backend::registry::Resource;
use crate::backend::server::state::AppState;
use crate::shared::{Record, SharedError};

pub mod create;
pub mod delete;
pub mod read;
pub mod update;

pub use create::create_record;
pub use delete::delete_record;
pub use read::{list_records, read_record};
pub use update::update_record;

/// Resource owning `path`; a path without one is a permission failure
pub(crate) fn resolve_resource(app_state: &AppState, path: &str) -> Result<Arc<Resource>, ResourceError> {
    app_state.registry.resolve(path).ok_or_else(|| {
        tracing::warn!("[Resource] Attempted to access {} with no collection", path);
        ResourceError::denied("Permission denied.")
    })
}

/// Parse a write body
///
/// An empty body is an empty object. Anything that is not a JSON object is a
/// bad request.
pub(crate) fn parse_body(body: &Bytes) -> Result<Map<String, Value>, ResourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    let value: Value = serde_json::from_slice(body).map_err(SharedError::from)?;
    Ok(Record::from_value(value)?.into_attributes())
}

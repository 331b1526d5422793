//! Resource Module
//!
//! REST handlers for registered collections.
//!
//! # Module Structure
//!
//! ```text
//! resource/
//! ├── mod.rs       - Module exports and documentation
//! ├── query.rs     - pick / omit / whereKey / whereValue parameters
//! └── handlers/    - One handler per CRUD operation
//! ```
//!
//! # Status Codes
//!
//! - `200` read
//! - `206` create and update, with only reserved attributes in the body
//! - `204` delete
//! - `400` malformed JSON body
//! - `403` permission denied
//! - `404` record does not exist
//! - `422` validation failed (the validator's message)
//! - `500` any other store failure

pub mod handlers;
pub mod query;

pub use handlers::{create_record, delete_record, list_records, read_record, update_record};
pub use query::ReadQuery;

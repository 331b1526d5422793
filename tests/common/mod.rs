//! Common test utilities and helpers
//!
//! - Resource and server fixtures
//! - An SSE frame reader
//! - Custom assertion macros

pub mod fixtures;

pub use fixtures::*;
pub use sse::*;

//! Integration tests
//!
//! HTTP and SSE behaviour through the full router

pub mod api;
pub mod realtime;

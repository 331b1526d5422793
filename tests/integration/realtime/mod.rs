//! Realtime integration tests

mod sse_test;

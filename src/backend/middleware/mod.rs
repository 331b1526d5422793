//! Middleware Module
//!
//! HTTP middleware applied to every resource route.
//!
//! - **`identity`** - Copies the forwarded caller identity into request
//!   extensions and provides the `CurrentUser` extractor
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::middleware::from_fn_with_state;
//! use restfeed::backend::middleware::identity_middleware;
//!
//! // let router = router.layer(from_fn_with_state(app_state.clone(), identity_middleware));
//! ```

pub mod identity;

pub use identity::{identity_from_headers, identity_middleware, AuthenticatedUser, CurrentUser};

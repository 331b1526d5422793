/**
 * Identity Middleware
 *
 * Authentication happens outside this server. Whatever sits in front of it
 * forwards the caller's identity in two headers, which this middleware copies
 * into an `AuthenticatedUser` request extension:
 *
 * - identity header (default `x-user-id`): the user id
 * - roles header (default `x-user-roles`): comma-separated role names
 *
 * When an outer layer has already attached an `AuthenticatedUser`, the
 * headers are ignored. Requests without an identity pass through unchanged;
 * permission policies decide what anonymous callers may do.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::convert::Infallible;

use crate::backend::server::state::AppState;

/// Identity of the caller, as forwarded by the fronting layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Read an identity from request headers
///
/// Returns `None` when the identity header is missing, not valid UTF-8, or
/// blank.
pub fn identity_from_headers(
    headers: &HeaderMap,
    identity_header: &str,
    roles_header: &str,
) -> Option<AuthenticatedUser> {
    let id = headers
        .get(identity_header)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())?;

    let roles = headers
        .get(roles_header)
        .and_then(|h| h.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(AuthenticatedUser {
        id: id.to_string(),
        roles,
    })
}

/// Attach the forwarded identity to the request
pub async fn identity_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        let config = &app_state.config;
        if let Some(user) =
            identity_from_headers(request.headers(), &config.identity_header, &config.roles_header)
        {
            tracing::debug!("[Identity] Request from user {}", user.id);
            request.extensions_mut().insert(user);
        }
    }

    next.run(request).await
}

/// Axum extractor for the optional caller identity
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

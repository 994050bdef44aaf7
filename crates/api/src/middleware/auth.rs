//! Admin authentication middleware.
//!
//! The admin surface is gated by a single bearer token whose SHA-256 digest
//! lives in configuration. Auth as such (users, sessions, roles) is an
//! external collaborator; this is only the opaque credential check for the
//! JSON admin API.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Middleware requiring a valid admin bearer token.
///
/// With no digest configured the admin API is disabled outright.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let configured = &state.config.security.admin_token_sha256;
    if configured.is_empty() {
        return Err(ApiError::ServiceUnavailable(
            "Admin API is not configured".to_string(),
        ));
    }

    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    if !shared::crypto::verify_sha256(token, configured) {
        tracing::warn!(path = %req.uri().path(), "rejected admin request: invalid token");
        return Err(ApiError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(next.run(req).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

//! Session resolution middleware
//!
//! Runs in front of every route except [`UNAUTHENTICATED_PATHS`]. It reads the
//! `Authorization: Bearer <token>` header, decodes the session token, looks
//! the user up by the token's email and stores the result in the request
//! extensions as a [`SessionUser`]. A missing or undecodable token ends the
//! request with 401 before any handler runs.

use axum::{
    extract::{Extension, MatchedPath, Request},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::extractors::SessionUser;
use super::token::decode_session_token;
use crate::common::{safe_email_log, safe_token_log, ApiError, SharedState};

/// Routes that are served without a session
pub const UNAUTHENTICATED_PATHS: &[&str] = &["/loginWithGoogle"];

const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated user.";

pub fn is_unauthenticated_path(path: &str) -> bool {
    UNAUTHENTICATED_PATHS.contains(&path)
}

/// Token following the literal `Bearer ` prefix, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

pub async fn resolve_session(
    Extension(state_lock): Extension<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if is_unauthenticated_path(&path) {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers()).ok_or_else(|| {
        warn!(path = %path, "Authentication failed: missing bearer token");
        ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    })?;

    let state = state_lock.read().await.clone();

    let claims = decode_session_token(&state.jwt_secret, &token).map_err(|e| {
        warn!(
            error = %e,
            token = %safe_token_log(&token),
            path = %path,
            "Authentication failed: session token rejected"
        );
        ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
    })?;

    let user = state.user_service.find_by_email(&claims.email).await?;

    debug!(
        email = %safe_email_log(&claims.email),
        path = %path,
        user_found = user.is_some(),
        "Session resolved"
    );

    request.extensions_mut().insert(SessionUser(user));
    Ok(next.run(request).await)
}

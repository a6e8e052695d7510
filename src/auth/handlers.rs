//! Authentication handlers

use axum::extract::{Extension, Json};
use tracing::{error, info, warn};

use super::extractors::SessionUser;
use super::models::{GoogleLoginPayload, LoginResponse};
use super::token::issue_session_token;
use crate::common::{safe_email_log, ApiError, JsonBody, SharedState};

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "hello": "world" }))
}

/// GET /session
/// Returns the user resolved for the presented session token
///
/// # Response
/// ```json
/// { "user": { "id": "...", "email": "...", "openAiApiKey": null, ... } }
/// ```
/// `user` is `null` when the token is valid but no account exists yet.
pub async fn session(SessionUser(user): SessionUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "user": user }))
}

/// POST /loginWithGoogle
/// Signs a Google identity in, creating the user on first sign-in
///
/// # Request Body
/// ```json
/// { "name": "Ada Lovelace", "email": "ada@example.com", "picture": "https://..." }
/// ```
///
/// # Response
/// ```json
/// { "jwt": "<session token>", "firstTimeSignIn": true }
/// ```
pub async fn login_with_google(
    Extension(state_lock): Extension<SharedState>,
    JsonBody(payload): JsonBody<GoogleLoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    info!("🔐 Received Google login request");
    let state = state_lock.read().await.clone();

    if payload.email.trim().is_empty() {
        warn!("Google login payload has an empty email");
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    let (user, first_time_sign_in) = state.user_service.find_or_create(&payload).await?;

    let jwt = issue_session_token(&state.jwt_secret, &user.email).map_err(|e| {
        error!(
            error = %e,
            user_id = %user.id,
            "JWT encoding error during Google login"
        );
        ApiError::InternalServer("jwt error".to_string())
    })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        first_time_sign_in,
        "User signed in via Google"
    );

    Ok(Json(LoginResponse {
        jwt,
        first_time_sign_in,
    }))
}

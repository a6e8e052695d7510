//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /` - Liveness placeholder
/// - `GET /session` - Current session's user (or null)
/// - `POST /loginWithGoogle` - Google sign-in, the only unauthenticated route
pub fn auth_routes() -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/session", get(handlers::session))
        .route("/loginWithGoogle", post(handlers::login_with_google))
}

//! Fixtures shared by the router and service tests

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::migrations::run_migrations;
use super::{AppState, SharedState};
use crate::auth::token::issue_session_token;
use crate::services::{KeyCipher, OpenAIService, UserService};

pub const TEST_JWT_SECRET: &str = "test_secret_key";

/// Migrated in-memory database. One connection, so every query sees the same data.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}

pub fn test_state(pool: SqlitePool, openai_base_url: &str) -> SharedState {
    test_state_with_cipher(pool, openai_base_url, None)
}

/// Same as [`test_state`] but sealing stored keys with `cipher`
pub fn test_state_with_cipher(
    pool: SqlitePool,
    openai_base_url: &str,
    cipher: Option<KeyCipher>,
) -> SharedState {
    Arc::new(RwLock::new(AppState {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        finetune_model: "gpt-3.5-turbo".to_string(),
        user_service: Arc::new(UserService::new(pool, cipher)),
        openai_service: Arc::new(
            OpenAIService::new(openai_base_url, Duration::from_secs(5)).expect("http client"),
        ),
    }))
}

pub fn bearer_for(email: &str) -> String {
    format!(
        "Bearer {}",
        issue_session_token(TEST_JWT_SECRET, email).expect("token")
    )
}

/// Create a user the way Google sign-in would, optionally with a stored key
pub async fn seed_user(state: &SharedState, email: &str, api_key: Option<&str>) {
    let users = state.read().await.user_service.clone();
    let profile = crate::auth::models::GoogleLoginPayload {
        name: Some("Test User".to_string()),
        email: email.to_string(),
        picture: None,
    };
    users.find_or_create(&profile).await.expect("seed user");
    if let Some(key) = api_key {
        users.update_api_key(email, key).await.expect("seed key");
    }
}

/// Drive one request through the router and decode the JSON reply
pub async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use axum::body::{to_bytes, Body};
    use tower::ServiceExt;

    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(auth) = authorization {
        builder = builder.header("authorization", auth);
    }
    let body = match body {
        // the web client posts JSON as text/plain
        Some(json) => {
            builder = builder.header("content-type", "text/plain;charset=UTF-8");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json response")
    };
    (status, json)
}

// src/app.rs
//! Router composition shared by the binary and the router tests

use axum::{extract::Extension, middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::common::SharedState;
use crate::{auth, finetune, logging_middleware};

pub fn build_router(shared: SharedState, cors_origins: &[String]) -> Router {
    let origins: Vec<axum::http::HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    Router::new()
        // ====================================================================
        // SESSION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // OPENAI PROXY ROUTES
        // ====================================================================
        .merge(finetune::finetune_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(auth::resolve_session))
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

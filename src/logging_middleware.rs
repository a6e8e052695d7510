// src/logging_middleware.rs
//! Debug-level request/response body logging with credentials masked

use axum::body::{to_bytes, HttpBody};
use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{debug, enabled, Level};

use crate::common::helpers::redact_secrets;

/// Bodies larger than this are not buffered for logging
const MAX_LOGGED_BODY: usize = 64 * 1024;

/// Render a body for the log; JSON is pretty-printed with secrets masked,
/// anything else is summarized by size
fn describe_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(mut json) => {
            redact_secrets(&mut json);
            serde_json::to_string_pretty(&json).unwrap_or_default()
        }
        Err(_) => format!("<{} bytes, not JSON>", bytes.len()),
    }
}

/// Only bodies of known length are buffered; streamed bodies pass through untouched
fn is_small(content_length: Option<&axum::http::HeaderValue>, exact_size: Option<u64>) -> bool {
    content_length
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or(exact_size)
        .map_or(false, |len| len <= MAX_LOGGED_BODY as u64)
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_small(
        request.headers().get(axum::http::header::CONTENT_LENGTH),
        request.body().size_hint().exact(),
    ) {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;
        if !bytes.is_empty() {
            debug!(
                method = %parts.method,
                uri = %parts.uri,
                request_body = %describe_body(&bytes),
                "📥 Request"
            );
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;

    if !is_small(
        response.headers().get(axum::http::header::CONTENT_LENGTH),
        response.body().size_hint().exact(),
    ) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if !bytes.is_empty() {
        debug!(
            status = %parts.status,
            response_body = %describe_body(&bytes),
            "📤 Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::services::openai::OpenAIError;
use crate::services::users::UserStoreError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    /// Non-success reply from the provider, relayed as-is
    Upstream {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::Upstream { status, body } => write!(f, "Upstream {}: {}", status, body),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::Upstream { status, body } => return (status, Json(body)).into_response(),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

impl From<UserStoreError> for ApiError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::Database(e) => ApiError::DatabaseError(e),
            UserStoreError::Encryption(e) => {
                error!(error = %e, "Stored API key could not be processed");
                ApiError::InternalServer("stored API key could not be processed".to_string())
            }
        }
    }
}

impl From<OpenAIError> for ApiError {
    fn from(e: OpenAIError) -> Self {
        match e {
            OpenAIError::Upstream { status, body } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            },
            OpenAIError::RequestFailed(msg) | OpenAIError::InvalidResponse(msg) => {
                ApiError::InternalServer(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_upstream_error_is_relayed_verbatim() {
        let body = serde_json::json!({
            "error": { "message": "Incorrect API key provided", "code": "invalid_api_key" }
        });
        let response = ApiError::from(OpenAIError::Upstream {
            status: 401,
            body: body.clone(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let relayed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(relayed, body);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_generic_500() {
        let response =
            ApiError::from(OpenAIError::RequestFailed("connection reset".to_string()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "connection reset");
        assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
    }
}

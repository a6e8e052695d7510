// src/common/body.rs
//! JSON request body extractor that ignores the declared content type

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ApiError;

/// Browser clients post JSON as `text/plain`, so `axum::Json`'s content-type
/// check would reject them. This reads the raw body and parses it as JSON.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable request body: {}", e)))?;

        serde_json::from_slice::<T>(&bytes).map(JsonBody).map_err(|e| {
            warn!(error = %e, "Rejected malformed JSON request body");
            ApiError::BadRequest(format!("invalid JSON body: {}", e))
        })
    }
}

//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use super::models::User;
use crate::common::ApiError;

/// The user resolved for this request by the session middleware.
///
/// `None` means the token was valid but no account exists for its email, or
/// the route is exempt from session resolution. Handlers decide what that
/// means for them.
#[derive(Debug, Clone, Default)]
pub struct SessionUser(pub Option<User>);

impl SessionUser {
    /// The resolved user, or 401 when the session has no account behind it
    pub fn require(self) -> Result<User, ApiError> {
        self.0
            .ok_or_else(|| ApiError::Unauthorized("no account for this session".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .unwrap_or_default())
    }
}

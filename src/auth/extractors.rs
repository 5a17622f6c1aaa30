use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// The authenticated caller, inserted into request extensions by the auth
/// middleware. Handlers take this as an extractor; reaching one without an
/// identity in place is an access violation, not an auth failure.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiError::Forbidden)
    }
}

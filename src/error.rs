use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the whole API surface. Every handler failure is one
/// of these kinds; the HTTP status code follows from the kind alone.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("not authorized!")]
    Unauthorized,
    #[error("Insufficient access. Access denied!")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("store operation failed")]
    Store(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

/// Generic failure body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct FailureMsg {
    pub error: String,
}

/// Generic success body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct SuccessMsg {
    pub message: String,
}

impl SuccessMsg {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Store and internal failures keep their detail in the log; the
        // wire only ever sees a generic message.
        let message = match &self {
            ApiError::Store(cause) => {
                error!(error = %cause, "store operation failed");
                "internal storage error".to_string()
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(FailureMsg { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_status_codes() {
        assert_eq!(
            ApiError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::not_found("no records found!").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_failure_never_leaks_driver_text() {
        let response = ApiError::Store(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_failures_keep_the_wire_messages() {
        assert_eq!(ApiError::Unauthorized.to_string(), "not authorized!");
        assert_eq!(
            ApiError::Forbidden.to_string(),
            "Insufficient access. Access denied!"
        );
    }
}

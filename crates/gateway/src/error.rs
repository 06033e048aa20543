//! Error responses for the account and appliance routes.
//!
//! Every failure is answered as `{"message": ...}`; server errors also carry
//! an `error` field with the underlying cause.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ecowatt_core::error::StoreError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid input (400)
    BadRequest(String),
    /// Referenced record does not exist (404)
    NotFound(String),
    /// Storage or hashing failure (500)
    Internal { message: String, cause: String },
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// A 500 with a route-specific message.
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Wrap a store failure for the named operation.
    pub fn store(message: impl Into<String>, err: StoreError) -> Self {
        Self::internal(message, err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(message) | Self::NotFound(message) => ErrorBody {
                message,
                error: None,
            },
            Self::Internal { message, cause } => {
                tracing::error!(error = %cause, "{message}");
                ErrorBody {
                    message,
                    error: Some(cause),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::store("Error fetching appliances", StoreError::QueryFailed("locked".into()))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_keeps_cause() {
        match ApiError::internal("Error logging in", "disk I/O error") {
            ApiError::Internal { message, cause } => {
                assert_eq!(message, "Error logging in");
                assert_eq!(cause, "disk I/O error");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

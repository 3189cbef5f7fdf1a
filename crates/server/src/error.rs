//! Error responses.
//!
//! Every failure a handler can hit is turned into one of these variants and
//! rendered as JSON:
//! - validation: `400` with a map of field name to messages
//! - malformed request: `400` with `{"detail": ...}`
//! - authentication: `401` with `{"detail": ...}`
//! - missing or foreign resource: `404` with `{"detail": "Not found."}`
//! - anything else: `500`, logged with the underlying cause

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use store::{StoreError, ValidationErrors};
use thiserror::Error;
use tracing::error;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),

    #[error("not found")]
    NotFound,

    #[error("invalid page")]
    InvalidPage,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
struct Detail<'a> {
    detail: &'a str,
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(Detail { detail: message })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(message) => detail(StatusCode::BAD_REQUEST, &message),
            ApiError::Unauthenticated(message) => detail(StatusCode::UNAUTHORIZED, message),
            ApiError::NotFound => detail(StatusCode::NOT_FOUND, "Not found."),
            ApiError::InvalidPage => detail(StatusCode::NOT_FOUND, "Invalid page."),
            ApiError::Internal(cause) => {
                error!("Request failed: {}", cause);
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound,
            StoreError::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Write bodies read every field leniently, so a well-formed body that
/// still fails to deserialize is not a JSON object.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Validation(ValidationErrors::single(
                "non_field_errors",
                "Invalid data. Expected a dictionary.",
            )),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

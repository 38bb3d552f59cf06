//! # API Errors
//!
//! Everything a handler can fail with, and how it looks on the wire.
//!
//! ## Status Mapping
//! ```text
//! ┌──────────────────────────┬────────┬──────────────────────────────────────┐
//! │ ApiError                 │ Status │ Body                                 │
//! ├──────────────────────────┼────────┼──────────────────────────────────────┤
//! │ Validation / BadRequest  │ 400    │ { error: <message> }                 │
//! │ InsufficientStock        │ 400    │ { error, available, requested }      │
//! │ EmailTaken               │ 400    │ { error }                            │
//! │ MissingToken, ...        │ 401    │ { error }                            │
//! │ Forbidden                │ 403    │ { error: "Admin access required" }   │
//! │ SweetNotFound, ...       │ 404    │ { error }                            │
//! │ RouteNotFound            │ 404    │ { error: "Not Found", message }      │
//! │ Internal                 │ 500    │ { error: "Internal server error" }   │
//! └──────────────────────────┴────────┴──────────────────────────────────────┘
//! ```
//!
//! `Internal` carries the real cause for the log only.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use sweetshop_core::{CoreError, ValidationError};
use sweetshop_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Insufficient stock")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required. No token provided.")]
    MissingToken,

    #[error("Authentication required. Invalid token format.")]
    MalformedToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Sweet not found")]
    SweetNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Not Found")]
    RouteNotFound { method: String, path: String },

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::InsufficientStock { .. }
            | ApiError::EmailTaken => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::MissingToken
            | ApiError::MalformedToken
            | ApiError::InvalidToken
            | ApiError::TokenExpired
            | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::SweetNotFound | ApiError::UserNotFound | ApiError::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::InsufficientStock {
                available,
                requested,
            } => json!({
                "error": self.to_string(),
                "available": available,
                "requested": requested,
            }),
            ApiError::RouteNotFound { method, path } => json!({
                "error": self.to_string(),
                "message": format!("Cannot {} {}", method, path),
            }),
            ApiError::Internal(detail) => {
                error!(%detail, "Request failed");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SweetNotFound(_) => ApiError::SweetNotFound,
            CoreError::UserNotFound(_) => ApiError::UserNotFound,
            CoreError::InsufficientStock {
                available,
                requested,
            } => ApiError::InsufficientStock {
                available,
                requested,
            },
            CoreError::Unauthenticated => ApiError::Unauthenticated,
            CoreError::Forbidden => ApiError::Forbidden,
            CoreError::EmailTaken(_) => ApiError::EmailTaken,
            CoreError::Validation(v) => v.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } if entity == "User" => ApiError::UserNotFound,
            DbError::NotFound { .. } => ApiError::SweetNotFound,
            DbError::Rejected(core) => core.into(),
            // users.email is the only unique column clients can collide on
            DbError::UniqueViolation { .. } => ApiError::EmailTaken,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{lifecycle::LifecycleError, policy::DenyReason, repository::RepositoryError};

/// ApiError
///
/// Every way a request can terminate unsuccessfully. None of these are retried.
/// Only `Store` is unexpected; the rest are caused by the caller's input.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `Authorization: Bearer ...` header, or an unparseable one.
    #[error("missing credential")]
    MissingCredential,
    /// A credential was presented but failed verification (tampered, wrong key, expired).
    #[error("invalid credential")]
    InvalidCredential,
    /// Login with an unknown e-mail or a wrong password. The two are indistinguishable.
    #[error("invalid email or password")]
    BadLogin,
    #[error("forbidden: {0:?}")]
    Forbidden(DenyReason),
    #[error("not found")]
    NotFound,
    #[error("validation failure: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store failure: {0}")]
    Store(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential | ApiError::BadLogin => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingCredential | ApiError::BadLogin => "UNAUTHORIZED",
            ApiError::InvalidCredential | ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe message. Authorization failures share one message so the
    /// response does not reveal roles or ownership.
    pub fn message(&self) -> String {
        match self {
            ApiError::MissingCredential => "Access token required".to_string(),
            ApiError::InvalidCredential => "Invalid token".to_string(),
            ApiError::BadLogin => "Invalid email or password".to_string(),
            ApiError::Forbidden(_) => "Not authorized to perform this action".to_string(),
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::Validation(msg) | ApiError::Conflict(msg) => msg.clone(),
            ApiError::Store(_) => "Server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(detail) => tracing::error!(error = %detail, "store failure"),
            ApiError::Forbidden(reason) => tracing::debug!(?reason, "request denied by policy"),
            _ => {}
        }

        let body = json!({
            "error": true,
            "code": self.error_code(),
            "message": self.message(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => {
                ApiError::Conflict("Email already registered".to_string())
            }
            RepositoryError::Database(e) => ApiError::Store(e.to_string()),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(format!("invalid query: {}", rejection.body_text()))
    }
}

/// An id segment that does not parse cannot name an existing resource.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "unparseable path");
        ApiError::NotFound
    }
}

/// Convenient result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

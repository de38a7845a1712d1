//! Service-level error taxonomy and its mapping to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Input that failed a bounds or shape check. Messages are client-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must be between 3 and 20 characters")]
    InvalidUsername,
    #[error("password must be at least 6 characters")]
    InvalidPassword,
    #[error("title must be between 5 and 100 characters")]
    InvalidTitle,
    #[error("description must be between 10 and 1000 characters")]
    InvalidDescription,
    #[error("price must be positive")]
    InvalidPrice,
    #[error("image_url must be an absolute http or https URL")]
    InvalidImageUrl,
}

/// Failures raised by the persistence adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    #[error("database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid request body: {0}")]
    MalformedBody(String),

    #[error("username already exists")]
    DuplicateUser,

    // Unknown user and wrong password share this variant on purpose.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("storage failure")]
    Store(#[from] StoreError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateUser => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Store(e) => {
                error!(error = ?e, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

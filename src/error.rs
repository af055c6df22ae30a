/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / PasswordError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::password::PasswordError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    // Unknown user and wrong password share this variant.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already in use")]
    DuplicateEmail,

    // No identity reached a route that needs one.
    #[error("authentication required")]
    AuthenticationMissing,

    // Identity present, role insufficient.
    #[error("access denied")]
    AuthorizationDenied,

    #[error("resource not found")]
    NotFound,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::DuplicateUsername => (StatusCode::CONFLICT, "DUPLICATE_USERNAME"),
            AppError::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
            AppError::AuthenticationMissing => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::AuthorizationDenied => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::UniqueViolation { field } if field == "email" => AppError::DuplicateEmail,
            RepoError::UniqueViolation { .. } => AppError::DuplicateUsername,
            RepoError::Db(e) => {
                tracing::error!(error = %e, "credential store failure");
                AppError::Internal
            }
            RepoError::Migrate(e) => {
                tracing::error!(error = %e, "credential store migration failure");
                AppError::Internal
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}

/*
 * Responsibility
 * - Shared AppError for handlers and extractors
 * - IntoResponse (HTTP status + JSON error body)
 * - Collapse repo / auth / id codec errors into one surface
 *
 * Authentication failures of any kind render identically (401 + generic message).
 * The distinction between them only exists in logs.
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;
use crate::services::id_codec::IdCodecError;

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
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

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
            RepoError::Conflict => AppError::Conflict("resource already exists".into()),
            RepoError::MissingReference => {
                AppError::invalid_request("referenced resource does not exist")
            }
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NoSuchUser | AuthError::BadCredentials | AuthError::InvalidToken => {
                AppError::Unauthorized
            }
            AuthError::PasswordMismatch => {
                AppError::invalid_request("password and confirmation do not match")
            }
            AuthError::InvalidInput(message) => AppError::InvalidRequest(message.into()),
            AuthError::UsernameTaken => AppError::Conflict("username is already taken".into()),
            AuthError::Unavailable(_) | AuthError::Internal => AppError::Internal,
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /conversations/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::invalid_request("invalid id")
            }
            // Server-side config / programming errors
            _ => AppError::Internal,
        }
    }
}

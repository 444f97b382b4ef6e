//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Body could not be read: over the size limit or a broken stream.
    #[error(transparent)]
    Body(#[from] BytesRejection),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Error payload: the raw cause plus a fixed summary per error class.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "Invalid request body")
            }
            AppError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            AppError::Body(rejection) => (rejection.status(), "Invalid request body"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

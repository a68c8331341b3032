//! Error types for Janus
//!
//! Defines the application error taxonomy and renders failures in the
//! messages-protocol error shape clients expect:
//! `{"type": "error", "error": {"type": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::translate::TranslationError;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Translation(#[from] TranslationError),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body in the messages-protocol shape
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Unauthorized | AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                self.to_string(),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                message.clone(),
            ),
            AppError::Translation(error) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                error.to_string(),
            ),
            AppError::JsonError(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "Invalid JSON in request".to_string(),
            ),
            AppError::Upstream { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "api_error",
                message.clone(),
            ),
            AppError::HttpError(_) => (
                StatusCode::BAD_GATEWAY,
                "api_error",
                "Upstream service error".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "api_error",
                "Internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            kind: "error".to_string(),
            error: ErrorBody {
                kind: error_type.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

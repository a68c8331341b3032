//! Authentication middleware
//!
//! Validates the client bearer token against the configured value. When no
//! token is configured, authentication is disabled (development mode).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::AppError, AppState};

/// Extract the Authorization header and return the bearer token
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Authentication middleware
///
/// This middleware:
/// 1. Passes everything through when no auth token is configured
/// 2. Extracts the bearer token from the Authorization header
/// 3. Compares it against the configured token
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.auth_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = extract_bearer_token(auth_header).ok_or(AppError::InvalidToken)?;

    if token != expected {
        warn!(path = %request.uri().path(), "Rejected request with invalid token");
        return Err(AppError::InvalidToken);
    }

    Ok(next.run(request).await)
}

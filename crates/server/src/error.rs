//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. Route handlers that can fail
//! return `Result<T, AppError>`.
//!
//! Per the error taxonomy: persistence failures never reach this type (the
//! repository recovers them locally), validation failures map to inline
//! 4xx responses with the draft untouched, external-service failures map to
//! 502 with the user-facing message, and an unknown store is a first-class
//! 404 page rather than an error dialog.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::editor::EditorError;
use crate::services::palette::PaletteError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation failed; reported inline, nothing was mutated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with in-flight state (e.g. a chat turn already
    /// streaming).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An external service call failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_) | Self::Upstream(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Upstream(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::UnknownStore(id) => Self::NotFound(format!("store '{id}'")),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<PaletteError> for AppError {
    fn from(err: PaletteError) -> Self {
        match err {
            PaletteError::MissingImage => {
                Self::BadRequest("sube una imagen del logo primero".to_string())
            }
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("store 'bodega'".to_string());
        assert_eq!(err.to_string(), "Not found: store 'bodega'");

        let err = AppError::Validation("empty store id".to_string());
        assert_eq!(err.to_string(), "Validation error: empty store id");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Upstream("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

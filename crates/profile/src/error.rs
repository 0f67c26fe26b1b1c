//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures store failures to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every failure body is the same JSON envelope:
//! `{"error": "..."}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for the profile engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// No profile exists for the requested user.
    #[error("no profile for uid {0}")]
    NotFound(String),

    /// The request payload is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The profile store failed or the write lost too many version races.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

/// JSON envelope for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture store failures to Sentry
        if matches!(self, Self::Unavailable(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose store internals to clients
        let message = match &self {
            Self::Unavailable(_) => "profile store unavailable".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Liveness check.
///
/// GET /health
///
/// Returns "ok" while the process is serving; checks no dependencies.
pub async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check.
///
/// GET /health/ready
///
/// Probes profile store connectivity; 503 until the store answers.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

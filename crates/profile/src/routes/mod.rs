//! HTTP route handlers for the profile engine.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (store connectivity)
//!
//! # Wishlist
//! POST /api/wishlist/add        - Save a product to the wishlist
//! POST /api/wishlist/remove     - Drop a product from the wishlist
//! POST /api/wishlist/clear      - Empty the wishlist
//!
//! # Purchases
//! POST /api/purchases           - Record a completed checkout (deduplicated)
//!
//! # Preferences
//! GET  /api/preferences         - Read the derived preference summary
//! POST /api/preferences/sync    - Recompute and persist the preference sets
//! ```

pub mod health;
pub mod preferences;
pub mod purchases;
pub mod wishlist;

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// JSON body extractor that reports rejections in the service error
/// envelope instead of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query extractor with the same envelope treatment.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Request body naming just the profile owner.
#[derive(Debug, Deserialize)]
pub struct UidRequest {
    pub uid: String,
}

/// Acknowledgement body for mutations with nothing else to report.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    const fn ok() -> Self {
        Self { success: true }
    }
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/clear", post(wishlist::clear))
}

/// Create the preference routes router.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(preferences::show))
        .route("/sync", post(preferences::sync))
}

/// Create all routes for the profile engine.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Wishlist mutations
        .nest("/api/wishlist", wishlist_routes())
        // Purchase recording
        .route("/api/purchases", post(purchases::record))
        // Preference summary
        .nest("/api/preferences", preference_routes())
}

/// Build the application router over `state`.
///
/// Middleware (tracing, CORS, Sentry) is layered on by the binary; tests
/// drive this router directly.
#[must_use]
pub fn router(state: AppState) -> Router {
    routes().with_state(state)
}

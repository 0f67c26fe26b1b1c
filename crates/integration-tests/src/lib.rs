//! Integration tests for the FinCommerce profile engine.
//!
//! The tests build the axum router in-process over the in-memory store, so
//! no database or network listener is required:
//!
//! ```bash
//! cargo test -p fincommerce-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `profile_api` - JSON API surface driven through the router
//! - `profile_sync` - orchestrator behavior under store conflicts and
//!   partial failures

use std::sync::Arc;

use fincommerce_profile::routes;
use fincommerce_profile::state::AppState;
use fincommerce_profile::store::ProfileStore;
use fincommerce_profile::store::memory::MemoryProfileStore;

/// A router wired to a fresh in-memory store, with the store handle kept
/// for direct state assertions.
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<MemoryProfileStore>,
}

/// Build a test application over a fresh in-memory store.
#[must_use]
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryProfileStore::new());
    TestApp {
        router: routes::router(AppState::new(store.clone())),
        store,
    }
}

/// Build a router over an arbitrary store implementation.
#[must_use]
pub fn router_over(store: Arc<dyn ProfileStore>) -> axum::Router {
    routes::router(AppState::new(store))
}

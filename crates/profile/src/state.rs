//! Application state shared across handlers.

use std::sync::Arc;

use crate::store::ProfileStore;
use crate::sync::ProfileSync;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store sits behind
/// `Arc<dyn ProfileStore>` so the same router serves Postgres in production
/// and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ProfileStore>,
    sync: ProfileSync,
}

impl AppState {
    /// Create a new application state over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        let sync = ProfileSync::new(Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner { store, sync }),
        }
    }

    /// Get a reference to the profile store (readiness checks).
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.inner.store
    }

    /// Get a reference to the profile sync orchestrator.
    #[must_use]
    pub fn sync(&self) -> &ProfileSync {
        &self.inner.sync
    }
}

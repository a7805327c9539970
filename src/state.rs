//! Shared application state, injected into every handler.
//!
//! The store and session store are constructed once and passed in explicitly
//! rather than reached through globals; tests build a fresh state per case.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store::new()),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

//! Application state for the web layer.

use std::sync::Arc;

use crate::registry::SessionRegistry;

/// Shared application state.
///
/// Handlers never touch a cascade directly; they find the rider's session
/// and send it actions.
#[derive(Clone)]
pub struct AppState {
    /// Live rider sessions, keyed by cookie
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(sessions: SessionRegistry) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}

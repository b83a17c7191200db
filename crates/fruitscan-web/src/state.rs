//! Application state.

use fruitscan_core::relay::Relay;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self { relay }
    }

    /// Static bearer token callers must present, if one is configured.
    pub fn relay_token(&self) -> Option<&str> {
        self.relay
            .config()
            .relay_token
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

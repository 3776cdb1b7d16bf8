//! Application state for the reservation HTTP server.

use cinereservas::ReservationStore;
use std::time::Duration;

/// How long a command handler waits for its effects (booking persistence)
/// before answering.
pub const DEFAULT_EFFECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the store is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// The reservation store every handler reads from and sends to
    pub store: ReservationStore,
    /// Upper bound on waiting for a command's effects
    pub effect_timeout: Duration,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(store: ReservationStore) -> Self {
        Self {
            store,
            effect_timeout: DEFAULT_EFFECT_TIMEOUT,
        }
    }

    /// Override how long command handlers wait for effects
    #[must_use]
    pub const fn with_effect_timeout(mut self, timeout: Duration) -> Self {
        self.effect_timeout = timeout;
        self
    }
}

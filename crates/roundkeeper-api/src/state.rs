//! Shared application state.

use std::sync::{Arc, Mutex};

use roundkeeper_core::clock::Clock;
use roundkeeper_core::repository::EventRepository;
use roundkeeper_core::rng::DeterministicRng;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for event timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Randomness for session codes and member emoji. Locked only around
    /// synchronous domain calls.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Event store holding every tab's stream.
    pub event_repository: Arc<dyn EventRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            clock,
            rng,
            event_repository,
        }
    }
}

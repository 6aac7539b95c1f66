use crate::clock::{Clock, SystemClock};
use crate::session::{LiveSession, SessionConfig, SessionController};
use crate::storage::{HistoryStore, KeyValueStore, Preferences};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single live captioning session
    pub live: Arc<LiveSession>,

    /// Saved sessions, shared with the controller
    pub history: HistoryStore,

    /// Last-chosen languages and room code
    pub preferences: Preferences,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, config: SessionConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let history = HistoryStore::new(Arc::clone(&store));
        let preferences = Preferences::new(store);
        let controller = SessionController::new(history.clone(), preferences.clone(), clock);

        Self {
            live: Arc::new(LiveSession::new(controller, config)),
            history,
            preferences,
        }
    }
}

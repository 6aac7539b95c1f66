use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing of a live captioning session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Interval between simulated sentences
    /// Default: 3000 ms
    pub sentence_interval_ms: u64,

    /// Interval between elapsed-time display updates
    /// Default: 1000 ms
    pub display_interval_ms: u64,

    /// Pause between halting the tickers and persisting the record,
    /// shown as "saving..." by clients
    /// Default: 500 ms
    pub save_delay_ms: u64,

    /// Capacity of the caption event channel
    pub event_buffer: usize,
}

impl SessionConfig {
    pub fn sentence_interval(&self) -> Duration {
        Duration::from_millis(self.sentence_interval_ms.max(1))
    }

    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_interval_ms.max(1))
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sentence_interval_ms: 3000,
            display_interval_ms: 1000,
            save_delay_ms: 500,
            event_buffer: 64,
        }
    }
}

//! Time sources for the session controller.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock timestamps for caption lines and session records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock anchored at construction and advanced by tokio's monotonic
/// clock, so a paused tokio runtime also pauses session timestamps.
#[derive(Debug, Clone)]
pub struct SystemClock {
    anchor_wall: DateTime<Utc>,
    anchor: tokio::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            anchor_wall: Utc::now(),
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = self.anchor.elapsed();
        // Overflow would need ~292 years of uptime
        self.anchor_wall + Duration::from_std(elapsed).unwrap_or_else(|_| Duration::zero())
    }
}

/// Clock that only moves when told to. Used to drive sessions step by step.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

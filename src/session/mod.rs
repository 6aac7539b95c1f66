//! Captioning session management
//!
//! This module provides the session state machine and its live driver:
//! - `SessionController`: subject/language selection, start, sentence ticks,
//!   stop and persistence
//! - `LiveSession`: display and sentence tickers on tokio timers, with a
//!   broadcast channel of caption events
//! - Record types persisted into the history

mod config;
mod record;
mod runner;
mod session;
mod state;
mod stats;

pub use config::SessionConfig;
pub use record::{CaptionLine, SessionRecord, LEGACY_SEPARATOR};
pub use runner::{CaptionEvent, LiveSession};
pub use session::{SessionController, SettingsUpdate};
pub use state::SessionPhase;
pub use stats::{format_elapsed, SessionStatus};

//! HTTP API for the captioning page
//!
//! This module provides a JSON API for driving sessions and browsing history:
//! - GET /subjects - Subject registry
//! - GET /settings, PUT /settings/languages - Language settings
//! - POST /room-code - Regenerate the room code
//! - POST /session/subject, /session/start, /session/stop - Session control
//! - GET /session/status - Live session snapshot
//! - GET /history, GET|DELETE /history/:id - Saved sessions
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

//! Durable client-side storage
//!
//! This module provides the key-value document that stands in for browser
//! local storage, and the typed views over it:
//! - `KeyValueStore`: string keys to string values, `FileStore` on disk and
//!   `MemoryStore` for tests
//! - `HistoryStore`: the persisted list of finished sessions
//! - `Preferences`: input/output languages and the room code

mod history;
mod kv;
mod preferences;
mod wire;

pub use history::{HistoryStore, HISTORY_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use preferences::{
    Preferences, DEFAULT_INPUT_LANGUAGE, INPUT_LANGUAGE_KEY, OUTPUT_LANGUAGES_KEY, ROOM_CODE_KEY,
};
pub use wire::{decode_records, encode_records};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::kv::KeyValueStore;
use super::wire::{decode_records, encode_records};
use crate::error::StorageError;
use crate::session::SessionRecord;

/// Storage key of the history document
pub const HISTORY_KEY: &str = "translationHistory";

/// Persisted list of finished sessions, oldest first.
///
/// Mutated only by [`append`](Self::append) when a session stops and by the
/// removal methods. Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// All records in insertion order.
    ///
    /// A corrupt document reads as empty. Entries in an older layout are
    /// migrated and the document is rewritten once.
    pub fn load(&self) -> Vec<SessionRecord> {
        let Some(raw) = self.kv.get(HISTORY_KEY) else {
            return Vec::new();
        };

        match decode_records(&raw) {
            Ok((records, migrated)) => {
                if migrated {
                    info!("Migrating {} history records to the current layout", records.len());
                    if let Err(e) = self.save(&records) {
                        error!("Failed to rewrite migrated history: {}", e);
                    }
                }
                records
            }
            Err(e) => {
                warn!("History document is corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<SessionRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    pub fn append(&self, record: SessionRecord) -> Result<(), StorageError> {
        let mut records = self.load();
        info!(
            "Appending session {} ({}, {} lines) to history",
            record.id,
            record.subject_code,
            record.lines.len()
        );
        records.push(record);
        self.save(&records)
    }

    /// Removes the record with `id`. Returns whether one was found.
    pub fn remove(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        info!("Removed session {} from history", id);
        self.save(&records)?;
        Ok(true)
    }

    /// Removes every record that started at exactly `start_time`.
    /// Returns how many were removed.
    pub fn remove_by_start_time(&self, start_time: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.start_time != start_time);
        let removed = before - records.len();
        if removed > 0 {
            info!("Removed {} session(s) started at {}", removed, start_time);
            self.save(&records)?;
        }
        Ok(removed)
    }

    fn save(&self, records: &[SessionRecord]) -> Result<(), StorageError> {
        let body = encode_records(records).map_err(|source| StorageError::Encode {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.kv.set(HISTORY_KEY, &body)
    }
}

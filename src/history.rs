//! Browsing previously saved sessions.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;
use crate::session::SessionRecord;
use crate::storage::HistoryStore;
use crate::subjects::subject_color;

/// Subject and calendar-day filters, combined with AND. `None` matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub subject_id: Option<u32>,
    /// Day the session started on, in local time
    pub date: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Match with the day boundaries of `tz`.
    pub fn matches_in<Tz: TimeZone>(&self, record: &SessionRecord, tz: &Tz) -> bool {
        if self.subject_id.is_some_and(|id| id != record.subject_id) {
            return false;
        }
        match self.date {
            Some(date) => record.start_time.with_timezone(tz).date_naive() == date,
            None => true,
        }
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.matches_in(record, &Local)
    }
}

/// List entry for a saved session
#[derive(Debug, Clone, Serialize)]
pub struct HistorySummary {
    pub id: Uuid,
    pub subject_id: u32,
    pub subject_name: String,
    pub subject_code: String,
    pub color: &'static str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: i64,
    pub duration: String,
    pub line_count: usize,
}

impl From<&SessionRecord> for HistorySummary {
    fn from(record: &SessionRecord) -> Self {
        Self {
            id: record.id,
            subject_id: record.subject_id,
            subject_name: record.subject_name.clone(),
            subject_code: record.subject_code.clone(),
            color: subject_color(record.subject_id),
            start_time: record.start_time,
            end_time: record.end_time,
            duration_ms: record.duration_ms,
            duration: record.duration_label(),
            line_count: record.lines.len(),
        }
    }
}

/// Read-mostly view over a [`HistoryStore`]
pub struct HistoryBrowser<'a> {
    store: &'a HistoryStore,
}

impl<'a> HistoryBrowser<'a> {
    pub fn new(store: &'a HistoryStore) -> Self {
        Self { store }
    }

    /// Matching records, most recently ended first.
    pub fn list(&self, filter: &HistoryFilter) -> Vec<SessionRecord> {
        self.list_in(filter, &Local)
    }

    pub fn list_in<Tz: TimeZone>(&self, filter: &HistoryFilter, tz: &Tz) -> Vec<SessionRecord> {
        let mut records: Vec<SessionRecord> = self
            .store
            .load()
            .into_iter()
            .filter(|r| filter.matches_in(r, tz))
            .collect();
        records.sort_by(|a, b| b.end_time.cmp(&a.end_time));
        records
    }

    pub fn summaries(&self, filter: &HistoryFilter) -> Vec<HistorySummary> {
        self.list(filter).iter().map(HistorySummary::from).collect()
    }

    pub fn get(&self, id: Uuid) -> Option<SessionRecord> {
        self.store.get(id)
    }

    pub fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.store.remove(id)
    }

    /// Removes every record started at `start_time`, for callers that only
    /// know the start time.
    pub fn delete_by_start_time(&self, start_time: DateTime<Utc>) -> Result<usize, StorageError> {
        self.store.remove_by_start_time(start_time)
    }
}

/// Human-readable duration: `1h 2m 3s`, `2m 3s` or `3s`.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

//! JSON layout of the history document.
//!
//! Field names follow the document written by earlier versions of the page
//! (`subjectId`, `startTime`, `addedToHistory`, ...). Older documents may lack
//! record ids or the structured `translations` array of a line; both are
//! filled in here, at import time, and reported so the caller can rewrite the
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::{EntryLanguage, OutputLanguage};
use crate::session::{CaptionLine, SessionRecord, LEGACY_SEPARATOR};
use crate::translation::TranslationEntry;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    subject_id: u32,
    subject_name: String,
    subject_code: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    /// Milliseconds
    duration: i64,
    #[serde(default)]
    translations: Vec<StoredLine>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLine {
    original: String,
    /// Flattened ` | `-joined translations, written for older readers only
    #[serde(default)]
    translated: Option<String>,
    #[serde(default)]
    translations: Option<Vec<TranslationEntry>>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    added_to_history: bool,
}

impl From<&SessionRecord> for StoredRecord {
    fn from(record: &SessionRecord) -> Self {
        Self {
            id: Some(record.id),
            subject_id: record.subject_id,
            subject_name: record.subject_name.clone(),
            subject_code: record.subject_code.clone(),
            start_time: record.start_time,
            end_time: record.end_time,
            duration: record.duration_ms,
            translations: record
                .lines
                .iter()
                .map(|line| StoredLine {
                    original: line.original.clone(),
                    translated: Some(line.joined_translation()),
                    translations: Some(line.translations.clone()),
                    timestamp: Some(line.timestamp),
                    added_to_history: line.committed_to_history,
                })
                .collect(),
        }
    }
}

impl StoredRecord {
    /// Converts to the in-memory record, returning whether anything had to
    /// be migrated.
    fn into_record(self) -> (SessionRecord, bool) {
        let mut migrated = self.id.is_none();
        let start_time = self.start_time;
        let id = self
            .id
            .unwrap_or_else(|| legacy_id(self.subject_id, start_time, self.end_time));

        let lines = self
            .translations
            .into_iter()
            .map(|line| {
                let translations = match line.translations {
                    Some(entries) => entries,
                    None => {
                        migrated = true;
                        split_legacy(line.translated.as_deref().unwrap_or_default())
                    }
                };
                CaptionLine {
                    original: line.original,
                    translations,
                    timestamp: line.timestamp.unwrap_or(start_time),
                    committed_to_history: line.added_to_history,
                }
            })
            .collect();

        let record = SessionRecord {
            id,
            subject_id: self.subject_id,
            subject_name: self.subject_name,
            subject_code: self.subject_code,
            start_time,
            end_time: self.end_time,
            duration_ms: self.duration,
            lines,
        };
        (record, migrated)
    }
}

/// Id for a record stored without one. Derived from the record itself so it
/// stays the same on every load, even if the migrated document is never
/// written back.
fn legacy_id(subject_id: u32, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Uuid {
    let name = format!(
        "{}|{}|{}",
        subject_id,
        start_time.timestamp_millis(),
        end_time.timestamp_millis()
    );
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Position of each part of a flattened translation string, as older pages
/// labelled them.
fn legacy_language(index: usize) -> EntryLanguage {
    match index {
        0 => OutputLanguage::English.into(),
        1 => OutputLanguage::Chinese.into(),
        2 => EntryLanguage::Other("LANGUAGE::SPANISH".to_string()),
        3 => OutputLanguage::Japanese.into(),
        n => EntryLanguage::Other(format!("Language {}", n + 1)),
    }
}

fn split_legacy(translated: &str) -> Vec<TranslationEntry> {
    if !translated.contains(LEGACY_SEPARATOR) {
        return vec![TranslationEntry {
            language: EntryLanguage::Default,
            text: translated.to_string(),
        }];
    }
    translated
        .split(LEGACY_SEPARATOR)
        .enumerate()
        .map(|(i, text)| TranslationEntry {
            language: legacy_language(i),
            text: text.to_string(),
        })
        .collect()
}

/// Serializes records into the history document layout.
pub fn encode_records(records: &[SessionRecord]) -> serde_json::Result<String> {
    let stored: Vec<StoredRecord> = records.iter().map(StoredRecord::from).collect();
    serde_json::to_string(&stored)
}

/// Parses a history document. The flag is `true` when older entries were
/// migrated and the document should be written back.
pub fn decode_records(json: &str) -> serde_json::Result<(Vec<SessionRecord>, bool)> {
    let stored: Vec<StoredRecord> = serde_json::from_str(json)?;
    let mut migrated = false;
    let records = stored
        .into_iter()
        .map(|r| {
            let (record, changed) = r.into_record();
            migrated |= changed;
            record
        })
        .collect();
    Ok((records, migrated))
}

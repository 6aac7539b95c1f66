use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::format_duration;
use crate::translation::TranslationEntry;

/// Separator used by the flattened translation string of older documents
pub const LEGACY_SEPARATOR: &str = " | ";

/// One simulated sentence with its translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionLine {
    /// Recognized source sentence
    pub original: String,

    /// One entry per output language, in selection order
    pub translations: Vec<TranslationEntry>,

    /// When the sentence tick produced this line
    pub timestamp: DateTime<Utc>,

    /// Whether the line has been folded into the session record.
    /// The newest line stays live until the next tick or stop.
    pub committed_to_history: bool,
}

impl CaptionLine {
    /// All translations joined with ` | `, the flattened form older
    /// documents stored.
    pub fn joined_translation(&self) -> String {
        self.translations
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(LEGACY_SEPARATOR)
    }
}

/// A finished session as persisted in the history document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Assigned when the session starts
    pub id: Uuid,

    pub subject_id: u32,
    pub subject_name: String,
    pub subject_code: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// `end_time - start_time` in milliseconds
    pub duration_ms: i64,

    /// Every caption line produced during the session, oldest first
    pub lines: Vec<CaptionLine>,
}

impl SessionRecord {
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_ms)
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record::CaptionLine;
use super::state::SessionPhase;
use crate::language::OutputLanguage;
use crate::subjects::Subject;

/// Snapshot of the session controller for status displays
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub phase: SessionPhase,

    /// Subject chosen for the next (or current) session
    pub selected_subject: Option<Subject>,

    /// Subject of the open session, if any
    pub session_subject: Option<Subject>,

    /// Languages the open session translates into
    pub session_languages: Vec<OutputLanguage>,

    /// When the open session started
    pub started_at: Option<DateTime<Utc>>,

    /// Elapsed time as `HH:MM:SS`, `00:00:00` when idle
    pub elapsed: String,

    /// Caption lines of the open session, oldest first
    pub lines: Vec<CaptionLine>,
}

impl SessionStatus {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The newest, still uncommitted line
    pub fn live_line(&self) -> Option<&CaptionLine> {
        self.lines.last().filter(|l| !l.committed_to_history)
    }
}

/// Formats elapsed milliseconds as `HH:MM:SS`.
pub fn format_elapsed(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61_500), "00:01:01");
        assert_eq!(format_elapsed(3_723_000), "01:02:03");
        assert_eq!(format_elapsed(-5), "00:00:00");
    }
}

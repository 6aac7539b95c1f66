use super::record::{CaptionLine, SessionRecord};
use super::state::SessionPhase;
use super::stats::{format_elapsed, SessionStatus};
use crate::clock::Clock;
use crate::error::{SessionError, UserInputError};
use crate::language::{LanguageSelection, OutputLanguage};
use crate::storage::{HistoryStore, Preferences};
use crate::subjects::{self, Subject};
use crate::translation::{self, sample_sentence};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Outcome of a settings change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsUpdate {
    /// The change only applies to the next session; the running one keeps
    /// its subject and languages.
    pub restart_required: bool,
}

/// The open session record while a session runs
struct ActiveSession {
    id: Uuid,
    subject: &'static Subject,
    languages: LanguageSelection,
    started_at: DateTime<Utc>,
    lines: Vec<CaptionLine>,
    /// Position in the simulated sentence stream
    cursor: usize,
}

/// Drives one captioning session at a time: start, sentence ticks, stop and
/// persistence into the history.
///
/// This type does no scheduling of its own. [`LiveSession`](super::LiveSession)
/// calls [`sentence_tick`](Self::sentence_tick) on a timer; tests call it
/// directly.
pub struct SessionController {
    clock: Arc<dyn Clock>,
    history: HistoryStore,
    preferences: Preferences,

    phase: SessionPhase,
    selected_subject: Option<&'static Subject>,
    input_language: String,
    output_languages: LanguageSelection,

    active: Option<ActiveSession>,
}

impl SessionController {
    /// Create an idle controller, restoring the last-chosen languages.
    pub fn new(history: HistoryStore, preferences: Preferences, clock: Arc<dyn Clock>) -> Self {
        let input_language = preferences.input_language();
        let output_languages = preferences.output_languages();

        Self {
            clock,
            history,
            preferences,
            phase: SessionPhase::Idle,
            selected_subject: None,
            input_language,
            output_languages,
            active: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn selected_subject(&self) -> Option<&'static Subject> {
        self.selected_subject
    }

    pub fn input_language(&self) -> &str {
        &self.input_language
    }

    pub fn output_languages(&self) -> &LanguageSelection {
        &self.output_languages
    }

    /// Choose the subject for the next session.
    pub fn select_subject(&mut self, id: u32) -> Result<SettingsUpdate, UserInputError> {
        let subject =
            subjects::find(id).ok_or_else(|| UserInputError::UnknownSubject(id.to_string()))?;
        self.selected_subject = Some(subject);
        info!("Selected subject {} ({})", subject.code, subject.name);
        Ok(self.settings_changed())
    }

    /// Replace the input language (if given) and the output selection, and
    /// remember both.
    pub fn update_languages(
        &mut self,
        input_language: Option<&str>,
        output_languages: Vec<OutputLanguage>,
    ) -> Result<SettingsUpdate, SessionError> {
        let selection = LanguageSelection::new(output_languages)?;
        let input = match input_language.map(str::trim) {
            Some("") => return Err(UserInputError::EmptyInputLanguage.into()),
            Some(code) => Some(code.to_string()),
            None => None,
        };

        if let Some(code) = input {
            self.preferences.set_input_language(&code)?;
            self.input_language = code;
        }
        self.preferences.set_output_languages(&selection)?;
        self.output_languages = selection;

        info!(
            "Language settings saved: input={}, outputs={:?}",
            self.input_language,
            self.output_languages.languages()
        );
        Ok(self.settings_changed())
    }

    /// Checkbox-style selection change. A fourth language is rejected and
    /// the selection stays as it was.
    pub fn toggle_output_language(
        &mut self,
        language: OutputLanguage,
    ) -> Result<SettingsUpdate, SessionError> {
        let mut selection = self.output_languages.clone();
        selection.toggle(language)?;
        self.preferences.set_output_languages(&selection)?;
        self.output_languages = selection;
        Ok(self.settings_changed())
    }

    fn settings_changed(&self) -> SettingsUpdate {
        let restart_required = self.phase.is_active();
        if restart_required {
            warn!("Settings changed during a running session; restart to apply them");
        }
        SettingsUpdate { restart_required }
    }

    /// Idle → Running.
    pub fn start(&mut self) -> Result<(), UserInputError> {
        if self.phase.is_active() {
            warn!("Session already started");
            return Err(UserInputError::AlreadyRunning);
        }

        let subject = self
            .selected_subject
            .ok_or(UserInputError::NoSubjectSelected)?;

        let session = ActiveSession {
            id: Uuid::new_v4(),
            subject,
            languages: self.output_languages.clone(),
            started_at: self.clock.now(),
            lines: Vec::new(),
            cursor: 0,
        };

        info!(
            "Starting session {} for {} ({}) in {:?}",
            session.id,
            subject.code,
            subject.name,
            session.languages.languages()
        );

        self.active = Some(session);
        self.phase = SessionPhase::Running;
        Ok(())
    }

    /// Advance the simulated speech stream by one sentence.
    ///
    /// Commits the previous line and appends a new live one. Returns `None`
    /// when no session is running, so late ticks have no effect.
    pub fn sentence_tick(&mut self) -> Option<CaptionLine> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        let now = self.clock.now();
        let session = self.active.as_mut()?;

        let sentence = sample_sentence(session.cursor);
        session.cursor = (session.cursor + 1) % translation::sentence_count();

        if let Some(previous) = session.lines.last_mut() {
            previous.committed_to_history = true;
        }

        let line = CaptionLine {
            original: sentence.to_string(),
            translations: translation::translate(sentence, session.languages.languages()),
            timestamp: now,
            committed_to_history: false,
        };
        session.lines.push(line.clone());

        Some(line)
    }

    /// Elapsed time of the running session as `HH:MM:SS`.
    pub fn elapsed_label(&self) -> Option<String> {
        let session = self.active.as_ref()?;
        let elapsed = self.clock.now() - session.started_at;
        Some(format_elapsed(elapsed.num_milliseconds()))
    }

    /// Running → Stopping. After this no tick has any effect.
    ///
    /// Calling it again while already stopping is allowed, so a failed
    /// persist can be retried.
    pub fn begin_stop(&mut self) -> Result<(), UserInputError> {
        match self.phase {
            SessionPhase::Idle => {
                warn!("Session not active");
                Err(UserInputError::NotRunning)
            }
            SessionPhase::Running => {
                info!("Stopping session");
                self.phase = SessionPhase::Stopping;
                Ok(())
            }
            SessionPhase::Stopping => Ok(()),
        }
    }

    /// Stopping → Idle: commit the final line, close the record and append it
    /// to the history.
    ///
    /// If the write fails the session stays in `Stopping` with its record
    /// intact.
    pub fn finish_stop(&mut self) -> Result<SessionRecord, SessionError> {
        if self.phase != SessionPhase::Stopping {
            return Err(UserInputError::NotRunning.into());
        }
        let Some(mut session) = self.active.take() else {
            self.phase = SessionPhase::Idle;
            return Err(UserInputError::NotRunning.into());
        };

        for line in &mut session.lines {
            line.committed_to_history = true;
        }

        // A record always spans at least 1 ms, even on a clock that has not moved
        let end_time = self
            .clock
            .now()
            .max(session.started_at + Duration::milliseconds(1));
        let record = SessionRecord {
            id: session.id,
            subject_id: session.subject.id,
            subject_name: session.subject.name.to_string(),
            subject_code: session.subject.code.to_string(),
            start_time: session.started_at,
            end_time,
            duration_ms: (end_time - session.started_at).num_milliseconds(),
            lines: session.lines.clone(),
        };

        if let Err(e) = self.history.append(record.clone()) {
            error!("Failed to persist session {}: {}", record.id, e);
            self.active = Some(session);
            return Err(e.into());
        }

        self.phase = SessionPhase::Idle;
        info!(
            "Session {} saved ({} lines, {})",
            record.id,
            record.lines.len(),
            record.duration_label()
        );
        Ok(record)
    }

    /// Stop and persist in one step.
    pub fn stop(&mut self) -> Result<SessionRecord, SessionError> {
        self.begin_stop()?;
        self.finish_stop()
    }

    pub fn status(&self) -> SessionStatus {
        let active = self.active.as_ref();
        SessionStatus {
            phase: self.phase,
            selected_subject: self.selected_subject.cloned(),
            session_subject: active.map(|s| s.subject.clone()),
            session_languages: active
                .map(|s| s.languages.languages().to_vec())
                .unwrap_or_default(),
            started_at: active.map(|s| s.started_at),
            elapsed: self
                .elapsed_label()
                .unwrap_or_else(|| format_elapsed(0)),
            lines: active.map(|s| s.lines.clone()).unwrap_or_default(),
        }
    }
}

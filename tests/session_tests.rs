// Tests for the session state machine
//
// The controller is driven by hand with a manual clock, one sentence tick at
// a time, against an in-memory store.

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use polytalk::{
    EntryLanguage, HistoryStore, KeyValueStore, ManualClock, MemoryStore, OutputLanguage,
    Preferences, SessionController, SessionError, SessionPhase, StorageError, UserInputError,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const GREETING: &str = "안녕하세요. 오늘은 웹 프로그래밍에 대해 배워보겠습니다.";

struct Fixture {
    controller: SessionController,
    history: HistoryStore,
    clock: Arc<ManualClock>,
}

fn fixture() -> Fixture {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let history = HistoryStore::new(Arc::clone(&store));
    let preferences = Preferences::new(store);
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap(),
    ));
    let controller = SessionController::new(history.clone(), preferences, clock.clone());
    Fixture {
        controller,
        history,
        clock,
    }
}

/// In-memory store whose writes can be switched off
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn check(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from("polytalk.json"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.remove(key)
    }
}

fn tick(f: &mut Fixture) {
    f.clock.advance(Duration::seconds(3));
    f.controller
        .sentence_tick()
        .expect("session should be running");
}

#[test]
fn test_start_without_subject_is_rejected() {
    let mut f = fixture();

    assert_eq!(f.controller.start(), Err(UserInputError::NoSubjectSelected));
    assert_eq!(f.controller.phase(), SessionPhase::Idle);
    assert!(f.history.is_empty());
}

#[test]
fn test_unknown_subject_is_rejected() {
    let mut f = fixture();
    assert_eq!(
        f.controller.select_subject(99),
        Err(UserInputError::UnknownSubject("99".into()))
    );
    assert!(f.controller.selected_subject().is_none());
}

#[test]
fn test_classroom_scenario() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(1)?;
    f.controller.update_languages(
        None,
        vec![OutputLanguage::English, OutputLanguage::Japanese],
    )?;
    f.controller.start()?;
    assert_eq!(f.controller.phase(), SessionPhase::Running);

    f.clock.advance(Duration::seconds(3));
    let line = f.controller.sentence_tick().expect("running");
    assert_eq!(line.original, GREETING);
    assert_eq!(line.translations.len(), 2);
    assert_eq!(
        line.translations[0].language,
        EntryLanguage::Known(OutputLanguage::English)
    );
    assert_eq!(
        line.translations[1].language,
        EntryLanguage::Known(OutputLanguage::Japanese)
    );
    assert!(!line.committed_to_history);

    f.clock.advance(Duration::seconds(1));
    let record = f.controller.stop()?;

    let saved = f.history.load();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0], record);
    assert_eq!(record.subject_code, "CS101");
    assert!(record.lines.iter().any(|l| l.translations.len() == 2));
    assert_eq!(f.controller.phase(), SessionPhase::Idle);

    Ok(())
}

#[test]
fn test_previous_line_commits_one_tick_late() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(2)?;
    f.controller.start()?;

    tick(&mut f);
    let status = f.controller.status();
    assert_eq!(status.line_count(), 1);
    assert!(!status.lines[0].committed_to_history);

    tick(&mut f);
    let status = f.controller.status();
    assert_eq!(status.line_count(), 2);
    assert!(status.lines[0].committed_to_history);
    assert!(!status.lines[1].committed_to_history);
    assert_eq!(status.live_line(), Some(&status.lines[1]));

    Ok(())
}

#[test]
fn test_stop_persists_every_line_committed() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(3)?;
    f.controller.start()?;

    let mut produced = Vec::new();
    for _ in 0..8 {
        f.clock.advance(Duration::seconds(3));
        produced.push(f.controller.sentence_tick().expect("running").original);
    }

    let record = f.controller.stop()?;

    assert_eq!(f.history.len(), 1);
    assert!(record.end_time > record.start_time);
    assert_eq!(record.duration_ms, 24_000);
    assert_eq!(record.lines.len(), 8);
    assert!(record.lines.iter().all(|l| l.committed_to_history));
    let originals: Vec<String> = record.lines.iter().map(|l| l.original.clone()).collect();
    assert_eq!(originals, produced);

    // Six sentences, then the stream starts over
    assert_eq!(record.lines[6].original, GREETING);

    Ok(())
}

#[test]
fn test_ticks_after_stop_have_no_effect() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(1)?;
    f.controller.start()?;
    tick(&mut f);

    f.controller.begin_stop()?;
    assert_eq!(f.controller.phase(), SessionPhase::Stopping);
    assert!(f.controller.sentence_tick().is_none());

    let record = f.controller.finish_stop()?;
    assert_eq!(record.lines.len(), 1);
    assert!(f.controller.sentence_tick().is_none());

    Ok(())
}

#[test]
fn test_stop_when_idle_is_rejected() {
    let mut f = fixture();
    assert!(matches!(
        f.controller.stop(),
        Err(SessionError::Input(UserInputError::NotRunning))
    ));
    assert!(f.history.is_empty());
}

#[test]
fn test_second_start_is_rejected_while_running() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(1)?;
    f.controller.start()?;
    assert_eq!(f.controller.start(), Err(UserInputError::AlreadyRunning));
    Ok(())
}

#[test]
fn test_settings_change_while_running_applies_to_next_session() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(1)?;
    f.controller.start()?;

    let update = f
        .controller
        .update_languages(Some("en"), vec![OutputLanguage::Chinese, OutputLanguage::Vietnamese])?;
    assert!(update.restart_required);
    assert!(f.controller.select_subject(4)?.restart_required);

    tick(&mut f);
    let record = f.controller.stop()?;
    assert_eq!(record.subject_code, "CS101");
    assert_eq!(
        record.lines[0].translations[0].language,
        EntryLanguage::Known(OutputLanguage::English)
    );

    // The next session picks up the new settings
    f.controller.start()?;
    tick(&mut f);
    let record = f.controller.stop()?;
    assert_eq!(record.subject_code, "CS401");
    assert_eq!(record.lines[0].translations.len(), 2);
    assert_eq!(
        record.lines[0].translations[0].language,
        EntryLanguage::Known(OutputLanguage::Chinese)
    );
    assert_eq!(f.history.len(), 2);

    Ok(())
}

#[test]
fn test_settings_change_while_idle_needs_no_restart() -> Result<()> {
    let mut f = fixture();
    let update = f
        .controller
        .update_languages(None, vec![OutputLanguage::Japanese])?;
    assert!(!update.restart_required);
    assert_eq!(
        f.controller.output_languages().languages(),
        &[OutputLanguage::Japanese]
    );
    Ok(())
}

#[test]
fn test_fourth_language_is_rejected_and_selection_kept() -> Result<()> {
    let mut f = fixture();
    f.controller.toggle_output_language(OutputLanguage::Chinese)?;
    f.controller.toggle_output_language(OutputLanguage::Japanese)?;

    let err = f
        .controller
        .toggle_output_language(OutputLanguage::Vietnamese)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Input(UserInputError::TooManyLanguages { max: 3 })
    ));
    assert_eq!(
        f.controller.output_languages().languages(),
        &[
            OutputLanguage::English,
            OutputLanguage::Chinese,
            OutputLanguage::Japanese
        ]
    );

    // Deselecting frees a slot
    f.controller.toggle_output_language(OutputLanguage::English)?;
    f.controller.toggle_output_language(OutputLanguage::Vietnamese)?;
    assert_eq!(f.controller.output_languages().len(), 3);

    Ok(())
}

#[test]
fn test_empty_language_update_is_rejected() {
    let mut f = fixture();
    assert!(matches!(
        f.controller.update_languages(None, vec![]),
        Err(SessionError::Input(UserInputError::NoOutputLanguage))
    ));
    assert!(matches!(
        f.controller
            .update_languages(Some("  "), vec![OutputLanguage::English]),
        Err(SessionError::Input(UserInputError::EmptyInputLanguage))
    ));
}

#[test]
fn test_languages_are_restored_from_preferences() -> Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let mut first = SessionController::new(
        HistoryStore::new(Arc::clone(&store)),
        Preferences::new(Arc::clone(&store)),
        clock.clone(),
    );
    first.update_languages(Some("ja"), vec![OutputLanguage::Vietnamese])?;

    let second = SessionController::new(
        HistoryStore::new(Arc::clone(&store)),
        Preferences::new(store),
        clock,
    );
    assert_eq!(second.input_language(), "ja");
    assert_eq!(
        second.output_languages().languages(),
        &[OutputLanguage::Vietnamese]
    );

    Ok(())
}

#[test]
fn test_elapsed_label_follows_clock() -> Result<()> {
    let mut f = fixture();
    assert!(f.controller.elapsed_label().is_none());
    assert_eq!(f.controller.status().elapsed, "00:00:00");

    f.controller.select_subject(5)?;
    f.controller.start()?;
    f.clock.advance(Duration::seconds(3_725));
    assert_eq!(f.controller.elapsed_label().as_deref(), Some("01:02:05"));

    Ok(())
}

#[test]
fn test_failed_save_keeps_session_for_retry() -> Result<()> {
    let store = Arc::new(FlakyStore::default());
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let history = HistoryStore::new(Arc::clone(&kv));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap(),
    ));
    let mut controller =
        SessionController::new(history.clone(), Preferences::new(kv), clock.clone());

    controller.select_subject(1)?;
    controller.start()?;
    clock.advance(Duration::seconds(3));
    controller.sentence_tick().expect("running");
    clock.advance(Duration::seconds(3));
    controller.sentence_tick().expect("running");

    store.fail_writes.store(true, Ordering::SeqCst);
    assert!(matches!(controller.stop(), Err(SessionError::Storage(_))));
    assert_eq!(controller.phase(), SessionPhase::Stopping);
    assert!(history.is_empty());
    assert_eq!(controller.status().line_count(), 2);
    assert!(controller.sentence_tick().is_none());

    store.fail_writes.store(false, Ordering::SeqCst);
    let record = controller.stop()?;
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(record.lines.len(), 2);
    assert!(record.lines.iter().all(|l| l.committed_to_history));
    assert_eq!(history.load(), vec![record]);

    Ok(())
}

#[test]
fn test_record_spans_at_least_one_millisecond() -> Result<()> {
    let mut f = fixture();
    f.controller.select_subject(2)?;
    f.controller.start()?;

    let record = f.controller.stop()?;
    assert!(record.end_time > record.start_time);
    assert_eq!(record.duration_ms, 1);
    assert!(record.lines.is_empty());
    Ok(())
}

// Tests for the timer-driven live session
//
// All tests run on a paused tokio clock, so the 1 s display tick and the
// 3 s sentence tick fire deterministically as virtual time advances.

use anyhow::Result;
use polytalk::session::CaptionEvent;
use polytalk::{
    HistoryStore, KeyValueStore, LiveSession, MemoryStore, Preferences, SessionConfig,
    SessionController, SessionPhase, SystemClock, UserInputError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;

fn live_session() -> (Arc<LiveSession>, HistoryStore) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let history = HistoryStore::new(Arc::clone(&store));
    let controller = SessionController::new(
        history.clone(),
        Preferences::new(store),
        Arc::new(SystemClock::new()),
    );
    let live = Arc::new(LiveSession::new(controller, SessionConfig::default()));
    (live, history)
}

async fn select(live: &LiveSession, subject_id: u32) -> Result<()> {
    live.controller().lock().await.select_subject(subject_id)?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sentence_tick_every_three_seconds() -> Result<()> {
    let (live, history) = live_session();
    select(&live, 1).await?;
    live.start().await?;

    sleep(Duration::from_millis(2_900)).await;
    assert_eq!(live.controller().lock().await.status().line_count(), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(live.controller().lock().await.status().line_count(), 1);

    sleep(Duration::from_secs(3)).await;
    let status = live.controller().lock().await.status();
    assert_eq!(status.line_count(), 2);
    assert!(status.lines[0].committed_to_history);
    assert!(!status.lines[1].committed_to_history);

    let record = live.stop().await?;
    assert_eq!(record.lines.len(), 2);
    assert!(record.lines.iter().all(|l| l.committed_to_history));
    assert!(record.end_time > record.start_time);
    assert!(record.duration_ms >= 6_000);
    assert_eq!(history.len(), 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_no_tick_fires_after_stop() -> Result<()> {
    let (live, history) = live_session();
    select(&live, 2).await?;
    live.start().await?;

    sleep(Duration::from_millis(9_500)).await;
    let record = live.stop().await?;
    assert_eq!(record.lines.len(), 3);

    let mut events = live.subscribe();
    sleep(Duration::from_secs(30)).await;

    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    let controller = live.controller();
    let controller = controller.lock().await;
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(controller.status().line_count(), 0);
    assert_eq!(history.load()[0].lines.len(), 3);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_events_stream_clock_then_caption() -> Result<()> {
    let (live, _history) = live_session();
    select(&live, 1).await?;
    let mut events = live.subscribe();
    live.start().await?;

    let mut clocks = Vec::new();
    let line = loop {
        match events.recv().await? {
            CaptionEvent::Clock { elapsed } => clocks.push(elapsed),
            CaptionEvent::Line { line } => break line,
            CaptionEvent::Saved { .. } => panic!("session saved unexpectedly"),
        }
    };

    assert!(clocks.len() >= 3);
    assert_eq!(clocks[..3], ["00:00:00", "00:00:01", "00:00:02"]);
    assert_eq!(
        line.original,
        "안녕하세요. 오늘은 웹 프로그래밍에 대해 배워보겠습니다."
    );

    let record = live.stop().await?;
    let saved = loop {
        if let CaptionEvent::Saved { record_id } = events.recv().await? {
            break record_id;
        }
    };
    assert_eq!(saved, record.id);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_phase_is_stopping_while_saving() -> Result<()> {
    let (live, history) = live_session();
    select(&live, 3).await?;
    live.start().await?;
    sleep(Duration::from_secs(4)).await;

    let stopping = {
        let live = Arc::clone(&live);
        tokio::spawn(async move { live.stop().await })
    };

    sleep(Duration::from_millis(100)).await;
    assert_eq!(live.controller().lock().await.phase(), SessionPhase::Stopping);
    assert!(history.is_empty());

    let record = stopping.await??;
    assert_eq!(record.subject_code, "CS301");
    assert_eq!(history.len(), 1);
    assert_eq!(live.controller().lock().await.phase(), SessionPhase::Idle);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_start_without_subject_spawns_nothing() -> Result<()> {
    let (live, history) = live_session();

    let err = live.start().await.unwrap_err();
    assert_eq!(err, UserInputError::NoSubjectSelected);

    let mut events = live.subscribe();
    sleep(Duration::from_secs(10)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(history.is_empty());

    Ok(())
}

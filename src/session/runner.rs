use super::config::SessionConfig;
use super::record::{CaptionLine, SessionRecord};
use super::session::SessionController;
use super::state::SessionPhase;
use crate::error::{SessionError, UserInputError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Something a live session pushes to its viewers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaptionEvent {
    /// Display tick with the elapsed time as `HH:MM:SS`
    Clock { elapsed: String },

    /// A new live caption line; the previous one is now committed
    Line { line: CaptionLine },

    /// The session was stopped and saved
    Saved { record_id: uuid::Uuid },
}

/// A session controller driven by real (tokio) timers.
///
/// Runs two periodic tasks while a session is active: the display tick and
/// the sentence tick. Both are cancelled when the session stops.
pub struct LiveSession {
    controller: Arc<Mutex<SessionController>>,
    config: SessionConfig,
    events: broadcast::Sender<CaptionEvent>,
    tickers: Mutex<Vec<JoinHandle<()>>>,
}

impl LiveSession {
    pub fn new(controller: SessionController, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            controller: Arc::new(Mutex::new(controller)),
            config,
            events,
            tickers: Mutex::new(Vec::new()),
        }
    }

    /// Shared handle to the underlying controller
    pub fn controller(&self) -> Arc<Mutex<SessionController>> {
        Arc::clone(&self.controller)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CaptionEvent> {
        self.events.subscribe()
    }

    /// Start a session and its tickers
    pub async fn start(&self) -> Result<(), UserInputError> {
        let mut controller = self.controller.lock().await;
        controller.start()?;

        let mut tickers = self.tickers.lock().await;
        tickers.push(self.spawn_display_ticker());
        tickers.push(self.spawn_sentence_ticker());

        if let Some(elapsed) = controller.elapsed_label() {
            let _ = self.events.send(CaptionEvent::Clock { elapsed });
        }

        info!("Live session started");
        Ok(())
    }

    /// Stop the tickers, wait out the save delay and persist the record
    pub async fn stop(&self) -> Result<SessionRecord, SessionError> {
        self.controller.lock().await.begin_stop()?;

        {
            let mut tickers = self.tickers.lock().await;
            for task in tickers.drain(..) {
                task.abort();
            }
        }

        time::sleep(self.config.save_delay()).await;

        let record = self.controller.lock().await.finish_stop()?;
        let _ = self.events.send(CaptionEvent::Saved {
            record_id: record.id,
        });

        info!("Live session stopped");
        Ok(record)
    }

    fn spawn_display_ticker(&self) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let events = self.events.clone();
        let period = self.config.display_interval();

        tokio::spawn(async move {
            let mut interval = ticker(period);
            loop {
                interval.tick().await;
                let elapsed = {
                    let controller = controller.lock().await;
                    if controller.phase() != SessionPhase::Running {
                        break;
                    }
                    controller.elapsed_label()
                };
                if let Some(elapsed) = elapsed {
                    let _ = events.send(CaptionEvent::Clock { elapsed });
                }
            }
            debug!("Display ticker finished");
        })
    }

    fn spawn_sentence_ticker(&self) -> JoinHandle<()> {
        let controller = Arc::clone(&self.controller);
        let events = self.events.clone();
        let period = self.config.sentence_interval();

        tokio::spawn(async move {
            let mut interval = ticker(period);
            loop {
                interval.tick().await;
                let line = controller.lock().await.sentence_tick();
                match line {
                    Some(line) => {
                        debug!("Caption: {}", line.original);
                        let _ = events.send(CaptionEvent::Line { line });
                    }
                    None => break,
                }
            }
            debug!("Sentence ticker finished");
        })
    }
}

/// Interval whose first tick is one full period from now
fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

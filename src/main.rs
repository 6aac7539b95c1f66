use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use polytalk::session::CaptionEvent;
use polytalk::{
    create_router, subjects, AppState, Config, FileStore, HistoryBrowser, HistoryFilter,
    HistoryStore, KeyValueStore, OutputLanguage,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "polytalk", version, about = "Simulated classroom captioning and translation")]
struct Cli {
    /// Config file, extension optional
    #[arg(long, default_value = "config/polytalk")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,

    /// Run one session in the terminal and save it
    Demo {
        /// Subject id or course code
        #[arg(long, default_value = "CS101")]
        subject: String,

        /// Output languages, comma separated (en, zh, ja, vi)
        #[arg(long, value_delimiter = ',', default_value = "en")]
        languages: Vec<OutputLanguage>,

        /// Number of sentences to caption before stopping
        #[arg(long, default_value_t = 3)]
        sentences: usize,
    },

    /// Browse saved sessions
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved sessions, most recent first
    List {
        /// Only sessions of this subject id
        #[arg(long)]
        subject: Option<u32>,

        /// Only sessions started on this day (YYYY-MM-DD, local time)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show one session with all its captions
    Show { id: Uuid },

    /// Delete a saved session
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&cfg.storage.path)
            .with_context(|| format!("Failed to open storage at {}", cfg.storage.path))?,
    );

    match cli.command {
        Command::Serve => serve(&cfg, store).await,
        Command::Demo {
            subject,
            languages,
            sentences,
        } => demo(&cfg, store, &subject, languages, sentences).await,
        Command::History { action } => history(store, action),
    }
}

async fn serve(cfg: &Config, store: Arc<dyn KeyValueStore>) -> Result<()> {
    let state = AppState::new(store, cfg.session.clone());
    let live = Arc::clone(&state.live);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .context("HTTP server failed")?;

    // Save a session left running at shutdown
    let running = live.controller().lock().await.phase().is_active();
    if running {
        info!("Saving the running session before exit");
        live.stop().await.context("Failed to save running session")?;
    }

    Ok(())
}

async fn demo(
    cfg: &Config,
    store: Arc<dyn KeyValueStore>,
    subject: &str,
    languages: Vec<OutputLanguage>,
    sentences: usize,
) -> Result<()> {
    let subject = subjects::lookup(subject)?;
    let state = AppState::new(store, cfg.session.clone());
    let live = state.live;

    {
        let controller = live.controller();
        let mut controller = controller.lock().await;
        controller.select_subject(subject.id)?;
        if !languages.is_empty() {
            controller.update_languages(None, languages)?;
        }
    }

    let mut events = live.subscribe();
    live.start().await?;
    println!("{} ({}) started", subject.name, subject.code);

    let mut captioned = 0;
    while captioned < sentences {
        match events.recv().await {
            Ok(CaptionEvent::Clock { elapsed }) => print!("\r{}", elapsed),
            Ok(CaptionEvent::Line { line }) => {
                captioned += 1;
                println!("\n{}", line.original);
                for entry in &line.translations {
                    println!("  {}: {}", entry.language.display_name(), entry.text);
                }
            }
            Ok(CaptionEvent::Saved { .. }) => break,
            Err(RecvError::Lagged(skipped)) => warn!("Skipped {} caption events", skipped),
            Err(RecvError::Closed) => break,
        }
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    let record = live.stop().await?;
    println!(
        "\nSaved session {} ({} lines, {})",
        record.id,
        record.lines.len(),
        record.duration_label()
    );
    Ok(())
}

fn history(store: Arc<dyn KeyValueStore>, action: HistoryAction) -> Result<()> {
    let history = HistoryStore::new(store);
    let browser = HistoryBrowser::new(&history);

    match action {
        HistoryAction::List { subject, date } => {
            let filter = HistoryFilter {
                subject_id: subject,
                date,
            };
            let summaries = browser.summaries(&filter);
            if summaries.is_empty() {
                println!("No saved sessions.");
            }
            for item in summaries {
                println!(
                    "{}  {} ({})  {} ~ {} ({}, {} lines)",
                    item.id,
                    item.subject_name,
                    item.subject_code,
                    item.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                    item.end_time.with_timezone(&Local).format("%H:%M:%S"),
                    item.duration,
                    item.line_count
                );
            }
        }
        HistoryAction::Show { id } => {
            let record = browser
                .get(id)
                .with_context(|| format!("Session {} not found", id))?;
            println!(
                "{} ({})  {}",
                record.subject_name,
                record.subject_code,
                record.duration_label()
            );
            for line in &record.lines {
                println!(
                    "\n[{}] {}",
                    line.timestamp.with_timezone(&Local).format("%H:%M:%S"),
                    line.original
                );
                for entry in &line.translations {
                    println!("  {}: {}", entry.language.display_name(), entry.text);
                }
            }
        }
        HistoryAction::Delete { id } => {
            if browser.delete(id)? {
                println!("Deleted session {}", id);
            } else {
                println!("Session {} not found", id);
            }
        }
    }

    Ok(())
}

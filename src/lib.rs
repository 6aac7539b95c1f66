pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod language;
pub mod session;
pub mod storage;
pub mod subjects;
pub mod translation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{SessionError, StorageError, UserInputError};
pub use history::{format_duration, HistoryBrowser, HistoryFilter, HistorySummary};
pub use http::{create_router, AppState};
pub use language::{EntryLanguage, LanguageSelection, OutputLanguage, MAX_OUTPUT_LANGUAGES};
pub use session::{
    CaptionEvent, CaptionLine, LiveSession, SessionConfig, SessionController, SessionPhase,
    SessionRecord, SessionStatus, SettingsUpdate,
};
pub use storage::{FileStore, HistoryStore, KeyValueStore, MemoryStore, Preferences};
pub use subjects::Subject;
pub use translation::{translate, TranslationEntry};

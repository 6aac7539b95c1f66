//! Error taxonomy.
//!
//! User input problems are recoverable prompts, never fatal. Storage errors
//! only cover writes: unreadable documents are recovered by the store itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::language::OutputLanguage;

/// A request the user can fix by changing their selection.
///
/// The `Display` text is the prompt shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("please select a subject first")]
    NoSubjectSelected,

    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    #[error("select at least one output language")]
    NoOutputLanguage,

    #[error("at most {max} output languages can be selected")]
    TooManyLanguages { max: usize },

    #[error("{} is selected more than once", .0.display_name())]
    DuplicateLanguage(OutputLanguage),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("input language code must not be empty")]
    EmptyInputLanguage,

    #[error("a session is already running")]
    AlreadyRunning,

    #[error("no session is running")]
    NotRunning,
}

/// Failure to write the durable document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by session operations that may touch storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] UserInputError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

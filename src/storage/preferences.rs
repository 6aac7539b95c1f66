use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use super::kv::KeyValueStore;
use crate::error::{StorageError, UserInputError};
use crate::language::{LanguageSelection, OutputLanguage};

pub const INPUT_LANGUAGE_KEY: &str = "inputLanguage";
pub const OUTPUT_LANGUAGES_KEY: &str = "outputLanguages";
pub const ROOM_CODE_KEY: &str = "currentRoomCode";

/// Spoken language assumed until the user picks one
pub const DEFAULT_INPUT_LANGUAGE: &str = "ko";

const ROOM_CODE_DIGITS: usize = 4;

/// Last-chosen settings, kept next to the history in the same store
#[derive(Clone)]
pub struct Preferences {
    kv: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn input_language(&self) -> String {
        self.kv
            .get(INPUT_LANGUAGE_KEY)
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_INPUT_LANGUAGE.to_string())
    }

    pub fn set_input_language(&self, code: &str) -> Result<(), StorageError> {
        self.kv.set(INPUT_LANGUAGE_KEY, code)
    }

    /// Stored output languages. Unknown tags are dropped; anything that does
    /// not form a valid selection falls back to English only.
    pub fn output_languages(&self) -> LanguageSelection {
        let Some(raw) = self.kv.get(OUTPUT_LANGUAGES_KEY) else {
            return LanguageSelection::default();
        };

        let tags: Vec<String> = match serde_json::from_str(&raw) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("Failed to parse {} from storage: {}", OUTPUT_LANGUAGES_KEY, e);
                return LanguageSelection::default();
            }
        };

        let languages: Vec<OutputLanguage> = tags
            .iter()
            .filter_map(|tag| {
                let lang = OutputLanguage::from_tag(tag);
                if lang.is_none() {
                    warn!("Ignoring unknown output language {:?}", tag);
                }
                lang
            })
            .collect();

        LanguageSelection::new(languages).unwrap_or_else(|e: UserInputError| {
            warn!("Stored output languages are invalid ({}), using default", e);
            LanguageSelection::default()
        })
    }

    pub fn set_output_languages(&self, selection: &LanguageSelection) -> Result<(), StorageError> {
        let body = serde_json::to_string(selection).map_err(|source| StorageError::Encode {
            key: OUTPUT_LANGUAGES_KEY.to_string(),
            source,
        })?;
        self.kv.set(OUTPUT_LANGUAGES_KEY, &body)
    }

    /// The room code, generated and stored on first use.
    pub fn room_code(&self) -> Result<String, StorageError> {
        if let Some(raw) = self.kv.get(ROOM_CODE_KEY) {
            let code: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if !code.is_empty() {
                if code != raw {
                    self.kv.set(ROOM_CODE_KEY, &code)?;
                }
                return Ok(code);
            }
        }
        self.regenerate_room_code()
    }

    pub fn regenerate_room_code(&self) -> Result<String, StorageError> {
        let code = generate_room_code();
        self.kv.set(ROOM_CODE_KEY, &code)?;
        info!("Generated room code {}", code);
        Ok(code)
    }
}

fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

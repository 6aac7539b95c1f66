//! Output languages and the user's language selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UserInputError;

/// Maximum number of output languages a session can translate into.
pub const MAX_OUTPUT_LANGUAGES: usize = 3;

/// Target language for simulated translations.
///
/// Serialized with the `LANGUAGE::<NAME>` tags used by the stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputLanguage {
    #[serde(rename = "LANGUAGE::ENGLISH")]
    English,
    #[serde(rename = "LANGUAGE::CHINESE")]
    Chinese,
    #[serde(rename = "LANGUAGE::JAPANESE")]
    Japanese,
    #[serde(rename = "LANGUAGE::VIETNAMESE")]
    Vietnamese,
}

impl OutputLanguage {
    pub const ALL: [OutputLanguage; 4] = [
        OutputLanguage::English,
        OutputLanguage::Chinese,
        OutputLanguage::Japanese,
        OutputLanguage::Vietnamese,
    ];

    /// Storage tag, e.g. `LANGUAGE::ENGLISH`.
    pub fn tag(self) -> &'static str {
        match self {
            OutputLanguage::English => "LANGUAGE::ENGLISH",
            OutputLanguage::Chinese => "LANGUAGE::CHINESE",
            OutputLanguage::Japanese => "LANGUAGE::JAPANESE",
            OutputLanguage::Vietnamese => "LANGUAGE::VIETNAMESE",
        }
    }

    /// Name shown above the caption column, in the language itself.
    pub fn display_name(self) -> &'static str {
        match self {
            OutputLanguage::English => "English",
            OutputLanguage::Chinese => "中文",
            OutputLanguage::Japanese => "日本語",
            OutputLanguage::Vietnamese => "Tiếng Việt",
        }
    }

    /// Two-letter code used for collapsed caption columns.
    pub fn short_code(self) -> &'static str {
        match self {
            OutputLanguage::English => "EN",
            OutputLanguage::Chinese => "ZH",
            OutputLanguage::Japanese => "JA",
            OutputLanguage::Vietnamese => "VI",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.tag() == tag)
    }
}

impl fmt::Display for OutputLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Accepts a storage tag, a short code (`en`, `JA`) or an English name.
impl FromStr for OutputLanguage {
    type Err = UserInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(lang) = Self::from_tag(s) {
            return Ok(lang);
        }
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(OutputLanguage::English),
            "zh" | "chinese" => Ok(OutputLanguage::Chinese),
            "ja" | "japanese" => Ok(OutputLanguage::Japanese),
            "vi" | "vietnamese" => Ok(OutputLanguage::Vietnamese),
            _ => Err(UserInputError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Ordered, duplicate-free selection of 1 to [`MAX_OUTPUT_LANGUAGES`] languages.
///
/// Order is the order in which languages were picked and is the order of the
/// translation entries produced for each sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OutputLanguage>", into = "Vec<OutputLanguage>")]
pub struct LanguageSelection(Vec<OutputLanguage>);

impl LanguageSelection {
    pub fn new(languages: Vec<OutputLanguage>) -> Result<Self, UserInputError> {
        if languages.is_empty() {
            return Err(UserInputError::NoOutputLanguage);
        }
        if languages.len() > MAX_OUTPUT_LANGUAGES {
            return Err(UserInputError::TooManyLanguages {
                max: MAX_OUTPUT_LANGUAGES,
            });
        }
        for (i, lang) in languages.iter().enumerate() {
            if languages[..i].contains(lang) {
                return Err(UserInputError::DuplicateLanguage(*lang));
            }
        }
        Ok(Self(languages))
    }

    pub fn single(language: OutputLanguage) -> Self {
        Self(vec![language])
    }

    pub fn languages(&self) -> &[OutputLanguage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a selection built through `new`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, language: OutputLanguage) -> bool {
        self.0.contains(&language)
    }

    /// Checkbox semantics: selects `language` if absent, deselects it if
    /// present. A fourth selection or removing the last language is rejected
    /// and leaves the selection untouched.
    pub fn toggle(&mut self, language: OutputLanguage) -> Result<(), UserInputError> {
        if let Some(pos) = self.0.iter().position(|l| *l == language) {
            if self.0.len() == 1 {
                return Err(UserInputError::NoOutputLanguage);
            }
            self.0.remove(pos);
        } else {
            if self.0.len() >= MAX_OUTPUT_LANGUAGES {
                return Err(UserInputError::TooManyLanguages {
                    max: MAX_OUTPUT_LANGUAGES,
                });
            }
            self.0.push(language);
        }
        Ok(())
    }
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self::single(OutputLanguage::English)
    }
}

impl TryFrom<Vec<OutputLanguage>> for LanguageSelection {
    type Error = UserInputError;

    fn try_from(languages: Vec<OutputLanguage>) -> Result<Self, Self::Error> {
        Self::new(languages)
    }
}

impl From<LanguageSelection> for Vec<OutputLanguage> {
    fn from(selection: LanguageSelection) -> Self {
        selection.0
    }
}

/// Language label attached to a translation entry.
///
/// Besides the known output languages, stored documents may carry the
/// `default` marker or tags no longer offered (e.g. `LANGUAGE::SPANISH`);
/// those are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryLanguage {
    Known(OutputLanguage),
    Default,
    Other(String),
}

impl EntryLanguage {
    pub const DEFAULT_TAG: &'static str = "default";

    pub fn tag(&self) -> &str {
        match self {
            EntryLanguage::Known(lang) => lang.tag(),
            EntryLanguage::Default => Self::DEFAULT_TAG,
            EntryLanguage::Other(tag) => tag,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            EntryLanguage::Known(lang) => lang.display_name(),
            EntryLanguage::Default => "Default",
            EntryLanguage::Other(tag) if tag == "LANGUAGE::SPANISH" => "Español",
            EntryLanguage::Other(tag) => tag,
        }
    }
}

impl From<OutputLanguage> for EntryLanguage {
    fn from(lang: OutputLanguage) -> Self {
        EntryLanguage::Known(lang)
    }
}

impl From<String> for EntryLanguage {
    fn from(tag: String) -> Self {
        if tag == Self::DEFAULT_TAG {
            return EntryLanguage::Default;
        }
        match OutputLanguage::from_tag(&tag) {
            Some(lang) => EntryLanguage::Known(lang),
            None => EntryLanguage::Other(tag),
        }
    }
}

impl From<EntryLanguage> for String {
    fn from(lang: EntryLanguage) -> Self {
        match lang {
            EntryLanguage::Other(tag) => tag,
            other => other.tag().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for lang in OutputLanguage::ALL {
            assert_eq!(OutputLanguage::from_tag(lang.tag()), Some(lang));
            let json = serde_json::to_string(&lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.tag()));
        }
    }

    #[test]
    fn test_parse_short_codes() {
        assert_eq!("en".parse::<OutputLanguage>().unwrap(), OutputLanguage::English);
        assert_eq!("JA".parse::<OutputLanguage>().unwrap(), OutputLanguage::Japanese);
        assert_eq!(
            "LANGUAGE::VIETNAMESE".parse::<OutputLanguage>().unwrap(),
            OutputLanguage::Vietnamese
        );
        assert!(matches!(
            "klingon".parse::<OutputLanguage>(),
            Err(UserInputError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_entry_language_keeps_unknown_tags() {
        let lang = EntryLanguage::from("LANGUAGE::SPANISH".to_string());
        assert_eq!(lang, EntryLanguage::Other("LANGUAGE::SPANISH".into()));
        assert_eq!(lang.display_name(), "Español");
        assert_eq!(String::from(lang), "LANGUAGE::SPANISH");

        assert_eq!(EntryLanguage::from("default".to_string()), EntryLanguage::Default);
    }

    #[test]
    fn test_selection_rejects_invalid_sizes() {
        assert_eq!(
            LanguageSelection::new(vec![]),
            Err(UserInputError::NoOutputLanguage)
        );
        assert_eq!(
            LanguageSelection::new(OutputLanguage::ALL.to_vec()),
            Err(UserInputError::TooManyLanguages { max: 3 })
        );
        assert_eq!(
            LanguageSelection::new(vec![OutputLanguage::Chinese, OutputLanguage::Chinese]),
            Err(UserInputError::DuplicateLanguage(OutputLanguage::Chinese))
        );
    }

    #[test]
    fn test_selection_deserialize_validates() {
        let ok: LanguageSelection =
            serde_json::from_str(r#"["LANGUAGE::JAPANESE","LANGUAGE::ENGLISH"]"#).unwrap();
        assert_eq!(
            ok.languages(),
            &[OutputLanguage::Japanese, OutputLanguage::English]
        );

        assert!(serde_json::from_str::<LanguageSelection>("[]").is_err());
    }
}

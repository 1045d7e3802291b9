//! Localized reference data
//!
//! Question sets and UI strings are keyed by language code. Every lookup goes
//! through one rule: use the active language's entry when it exists, else the
//! English entry.
//!
//! ## Sources (in precedence order)
//!
//! 1. `.edi/locales/{questions,strings}.json` - Project overrides
//! 2. `<config dir>/edi/locales/{questions,strings}.json` - Global overrides
//! 3. Built-in tables compiled into the binary
//!
//! Override files are merged per language (questions) and per key (strings),
//! so a file only needs to carry the entries it changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EdiError, Result};

/// Language every lookup falls back to
pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN_QUESTIONS: &str = include_str!("../../locales/questions.json");
const BUILTIN_STRINGS: &str = include_str!("../../locales/strings.json");

/// A language the assistant can be switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// All languages offered by the language selector
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "zu", name: "isiZulu" },
    Language { code: "xh", name: "isiXhosa" },
    Language { code: "af", name: "Afrikaans" },
    Language { code: "st", name: "Sesotho" },
    Language { code: "tn", name: "Setswana" },
    Language { code: "ts", name: "Xitsonga" },
    Language { code: "ve", name: "Tshivenda" },
    Language { code: "ss", name: "siSwati" },
    Language { code: "nso", name: "Sepedi (Northern Sotho)" },
    Language { code: "nr", name: "isiNdebele" },
];

/// Languages offered by the language selector
pub fn languages() -> &'static [Language] {
    SUPPORTED_LANGUAGES
}

/// Display name for a language code
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.code == code)
        .map(|lang| lang.name)
}

/// One step of the intake questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    /// Display and selection order
    pub choices: Vec<String>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            prompt: prompt.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Keys for every localized UI string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringKey {
    Next,
    Finish,
    SelectionRequired,
    Analyzing,
    AnalysisFailed,
    Thinking,
    ChatError,
    ProcessingAudio,
    TranscriptionFailed,
    AudioError,
    GeneratingSummary,
    SummaryUnavailable,
    SummaryError,
    RegionSelectionRequired,
    RegionAnalysisFailed,
    /// Carries a `{language}` placeholder
    LanguageChanged,
}

impl StringKey {
    pub const ALL: &'static [StringKey] = &[
        StringKey::Next,
        StringKey::Finish,
        StringKey::SelectionRequired,
        StringKey::Analyzing,
        StringKey::AnalysisFailed,
        StringKey::Thinking,
        StringKey::ChatError,
        StringKey::ProcessingAudio,
        StringKey::TranscriptionFailed,
        StringKey::AudioError,
        StringKey::GeneratingSummary,
        StringKey::SummaryUnavailable,
        StringKey::SummaryError,
        StringKey::RegionSelectionRequired,
        StringKey::RegionAnalysisFailed,
        StringKey::LanguageChanged,
    ];
}

/// Localized strings for a single language
pub type StringBundle = HashMap<StringKey, String>;

/// Immutable question and string tables for all languages
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    questions: HashMap<String, Vec<Question>>,
    strings: HashMap<String, StringBundle>,
}

impl LocaleCatalog {
    /// Catalog built from the tables compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_QUESTIONS, BUILTIN_STRINGS)
    }

    /// Parse and validate a catalog from JSON tables
    pub fn from_json(questions_json: &str, strings_json: &str) -> Result<Self> {
        let catalog = Self {
            questions: parse_table(questions_json, "questions")?,
            strings: parse_table(strings_json, "strings")?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the built-in catalog and merge project/global overrides on top
    ///
    /// `project_dir` and `global_dir` are config directories; override files
    /// are read from their `locales/` subdirectory.
    pub fn load(project_dir: Option<&Path>, global_dir: Option<&Path>) -> Result<Self> {
        let mut catalog = Self {
            questions: parse_table(BUILTIN_QUESTIONS, "questions")?,
            strings: parse_table(BUILTIN_STRINGS, "strings")?,
        };

        // Global first so project entries win
        for dir in [global_dir, project_dir].into_iter().flatten() {
            let locales = dir.join("locales");
            if let Some(content) = read_override(&locales.join("questions.json"))? {
                let table: HashMap<String, Vec<Question>> = parse_table(&content, "questions")?;
                catalog.questions.extend(table);
            }
            if let Some(content) = read_override(&locales.join("strings.json"))? {
                let table: HashMap<String, StringBundle> = parse_table(&content, "strings")?;
                for (lang, bundle) in table {
                    catalog.strings.entry(lang).or_default().extend(bundle);
                }
            }
        }

        catalog.validate()?;
        Ok(catalog)
    }

    /// Question set for a language, falling back to English
    pub fn questions(&self, lang: &str) -> &[Question] {
        self.questions
            .get(lang)
            .or_else(|| self.questions.get(DEFAULT_LANGUAGE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the language has its own question set
    pub fn has_questions(&self, lang: &str) -> bool {
        self.questions.contains_key(lang)
    }

    /// Localized string, falling back to English
    pub fn text(&self, lang: &str, key: StringKey) -> &str {
        self.strings
            .get(lang)
            .and_then(|bundle| bundle.get(&key))
            .or_else(|| {
                self.strings
                    .get(DEFAULT_LANGUAGE)
                    .and_then(|bundle| bundle.get(&key))
            })
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Localized string with `{name}` placeholders substituted
    pub fn format(&self, lang: &str, key: StringKey, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.text(lang, key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    fn validate(&self) -> Result<()> {
        let english = self
            .questions
            .get(DEFAULT_LANGUAGE)
            .ok_or_else(|| EdiError::Locale("missing English question set".to_string()))?;
        if english.is_empty() {
            return Err(EdiError::Locale("English question set is empty".to_string()));
        }

        for (lang, set) in &self.questions {
            if set.is_empty() {
                return Err(EdiError::Locale(format!("question set for '{lang}' is empty")));
            }
            if let Some(index) = set.iter().position(|q| q.choices.is_empty()) {
                return Err(EdiError::Locale(format!(
                    "question {index} for '{lang}' has no choices"
                )));
            }
            if language_name(lang).is_none() {
                warn!("Question set for unlisted language '{}'", lang);
            }
        }

        let english_strings = self
            .strings
            .get(DEFAULT_LANGUAGE)
            .ok_or_else(|| EdiError::Locale("missing English string bundle".to_string()))?;
        if let Some(missing) = StringKey::ALL
            .iter()
            .find(|key| !english_strings.contains_key(key))
        {
            return Err(EdiError::Locale(format!(
                "English string bundle is missing {missing:?}"
            )));
        }

        debug!(
            "Locale catalog ready: {} question sets, {} string bundles",
            self.questions.len(),
            self.strings.len()
        );
        Ok(())
    }
}

fn parse_table<T: serde::de::DeserializeOwned>(content: &str, what: &str) -> Result<T> {
    serde_json::from_str(content)
        .map_err(|e| EdiError::Locale(format!("failed to parse {what} table: {e}")))
}

fn read_override(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    debug!("Loaded locale override {}", path.display());
    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = LocaleCatalog::builtin().unwrap();
        for lang in SUPPORTED_LANGUAGES {
            assert!(catalog.has_questions(lang.code), "{} has no questions", lang.code);
            assert_eq!(catalog.questions(lang.code).len(), 4);
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let catalog = LocaleCatalog::builtin().unwrap();
        assert_eq!(catalog.questions("fr"), catalog.questions("en"));
        assert_eq!(catalog.text("fr", StringKey::Next), "Next");
    }

    #[test]
    fn test_missing_string_falls_back_per_key() {
        let catalog = LocaleCatalog::builtin().unwrap();
        // Sesotho only localizes the thinking indicator
        assert_eq!(catalog.text("st", StringKey::Thinking), "EDI ea nahana...");
        assert_eq!(catalog.text("st", StringKey::Finish), "Finish");
        assert_eq!(catalog.text("af", StringKey::Finish), "Voltooi");
    }

    #[test]
    fn test_format_substitutes_placeholders() {
        let catalog = LocaleCatalog::builtin().unwrap();
        let text = catalog.format(
            "en",
            StringKey::LanguageChanged,
            &[("language", "isiZulu")],
        );
        assert_eq!(text, "Language changed to isiZulu");
    }

    #[test]
    fn test_rejects_question_without_choices() {
        let questions = r#"{"en": [{"prompt": "Anything?", "choices": []}]}"#;
        let err = LocaleCatalog::from_json(questions, BUILTIN_STRINGS).unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn test_rejects_incomplete_english_strings() {
        let strings = r#"{"en": {"next": "Next"}}"#;
        let err = LocaleCatalog::from_json(BUILTIN_QUESTIONS, strings).unwrap_err();
        assert!(matches!(err, EdiError::Locale(_)));
    }

    #[test]
    fn test_project_override_wins_over_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("locales")).unwrap();
        fs::create_dir_all(global.path().join("locales")).unwrap();

        fs::write(
            global.path().join("locales/strings.json"),
            r#"{"en": {"next": "Onward"}, "st": {"next": "Pele"}}"#,
        )
        .unwrap();
        fs::write(
            project.path().join("locales/strings.json"),
            r#"{"en": {"next": "Continue"}}"#,
        )
        .unwrap();

        let catalog = LocaleCatalog::load(Some(project.path()), Some(global.path())).unwrap();
        assert_eq!(catalog.text("en", StringKey::Next), "Continue");
        assert_eq!(catalog.text("st", StringKey::Next), "Pele");
        // Untouched keys keep their built-in text
        assert_eq!(catalog.text("en", StringKey::Finish), "Finish");
    }

    #[test]
    fn test_question_override_replaces_language_set() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("locales")).unwrap();
        fs::write(
            project.path().join("locales/questions.json"),
            r#"{"zu": [{"prompt": "Q", "choices": ["A", "B"]}]}"#,
        )
        .unwrap();

        let catalog = LocaleCatalog::load(Some(project.path()), None).unwrap();
        assert_eq!(catalog.questions("zu"), &[Question::new("Q", &["A", "B"])][..]);
        assert_eq!(catalog.questions("en").len(), 4);
    }
}

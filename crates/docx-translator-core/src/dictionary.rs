//! Ordered phrase dictionary used by the translation overlay.
//!
//! Entries keep their insertion order because matching is first-come: an
//! earlier entry claims a span before any later entry is tried. Longer
//! phrases therefore come before the shorter phrases they contain.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Built-in French -> Farsi table.
pub const DEFAULT_FRENCH_FARSI: &[(&str, &str)] = &[
    ("bonjour", "سلام"),
    ("bonsoir", "عصر بخیر"),
    ("bonne nuit", "شب بخیر"),
    ("au revoir", "خداحافظ"),
    ("merci beaucoup", "بسیار متشکرم"),
    ("merci", "متشکرم"),
    ("s'il vous plaît", "لطفاً"),
    ("s'il te plaît", "لطفاً"),
    ("excusez-moi", "ببخشید"),
    ("pardon", "ببخشید"),
    ("comment allez-vous", "حالتان چطور است"),
    ("ça va", "خوبم"),
    ("très bien", "خیلی خوب"),
    ("bien", "خوب"),
    ("oui", "بله"),
    ("non", "نه"),
    ("peut-être", "شاید"),
    ("aujourd'hui", "امروز"),
    ("hier", "دیروز"),
    ("demain", "فردا"),
    ("maintenant", "الان"),
    ("toujours", "همیشه"),
    ("jamais", "هرگز"),
    ("beaucoup", "خیلی"),
    ("un peu", "کمی"),
    ("grand", "بزرگ"),
    ("petit", "کوچک"),
    ("nouveau", "جدید"),
    ("vieux", "قدیمی"),
    ("jeune", "جوان"),
    ("important", "مهم"),
    ("facile", "آسان"),
    ("difficile", "سخت"),
    ("possible", "ممکن"),
    ("impossible", "غیرممکن"),
];

/// A single source -> target phrase with its compiled matcher.
#[derive(Debug, Clone)]
pub struct PhraseEntry {
    source: String,
    target: String,
    pattern: Regex,
}

impl PhraseEntry {
    fn new(source: &str, target: &str) -> Result<Self> {
        let source = source.trim().to_lowercase();
        if source.is_empty() {
            return Err(Error::DictionaryEntry {
                source_phrase: source,
                reason: "source phrase is empty".to_string(),
            });
        }

        let pattern = Regex::new(&phrase_pattern(&source)).map_err(|e| Error::DictionaryEntry {
            source_phrase: source.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source,
            target: target.to_string(),
            pattern,
        })
    }

    /// Lower-cased source phrase
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Case-insensitive, whole-word matcher for the source phrase
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Build the regex for a phrase.
///
/// `\b` is only added on a side that starts or ends with a word character,
/// and an ASCII apostrophe also accepts the typographic one.
fn phrase_pattern(source: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let escaped = regex::escape(source).replace('\'', "['’]");
    let lead = if source.starts_with(is_word) { r"\b" } else { "" };
    let tail = if source.ends_with(is_word) { r"\b" } else { "" };
    format!("(?i){lead}{escaped}{tail}")
}

/// Read-only, ordered phrase table.
#[derive(Debug, Clone, Default)]
pub struct PhraseDictionary {
    entries: Vec<PhraseEntry>,
}

#[derive(Debug, Deserialize)]
struct DictionaryFile {
    #[serde(default, rename = "phrase")]
    phrases: Vec<PhraseRecord>,
}

#[derive(Debug, Deserialize)]
struct PhraseRecord {
    source: String,
    target: String,
}

impl PhraseDictionary {
    /// Build a dictionary from ordered `(source, target)` pairs.
    ///
    /// A repeated source phrase keeps its first position and takes the
    /// latest target.
    pub fn from_pairs<S, T>(pairs: impl IntoIterator<Item = (S, T)>) -> Result<Self>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut entries: Vec<PhraseEntry> = Vec::new();
        for (source, target) in pairs {
            let entry = PhraseEntry::new(source.as_ref(), target.as_ref())?;
            if let Some(existing) = entries.iter_mut().find(|e| e.source == entry.source) {
                existing.target = entry.target;
            } else {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    /// The built-in French -> Farsi dictionary.
    ///
    /// # Panics
    /// Never in practice: the built-in phrases are non-empty and escaped.
    #[allow(clippy::expect_used)]
    pub fn french_farsi() -> Self {
        Self::from_pairs(DEFAULT_FRENCH_FARSI.iter().copied())
            .expect("built-in phrase table is valid")
    }

    /// Parse a TOML dictionary made of `[[phrase]]` tables with `source`
    /// and `target` keys. File order is matching order.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DictionaryFile = toml::from_str(content)
            .map_err(|e| Error::DictionaryLoad(format!("Failed to parse dictionary: {e}")))?;
        Self::from_pairs(file.phrases.into_iter().map(|p| (p.source, p.target)))
    }

    /// Load a TOML dictionary from disk
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::DictionaryLoad(format!(
                "Failed to read dictionary file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let dictionary = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded {} phrases from {}",
            dictionary.len(),
            path.as_ref().display()
        );
        Ok(dictionary)
    }

    pub fn entries(&self) -> &[PhraseEntry] {
        &self.entries
    }

    /// Target phrase for a source phrase, compared case-insensitively
    pub fn get(&self, source: &str) -> Option<&str> {
        let key = source.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.source == key)
            .map(PhraseEntry::target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::document::{FontSpec, MAX_FONT_SIZE_PT};

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Serde default functions for the French -> Farsi pair
fn default_source_lang() -> Lang {
    Lang::new(DEFAULT_SOURCE_LANG)
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which translation provider to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Google Translate web endpoint
    #[default]
    Google,
    /// Any OpenAI-compatible chat completions API
    OpenAi,
    /// No remote provider, dictionary overlay only
    Offline,
}

impl Backend {
    pub const fn default_api_base(self) -> &'static str {
        match self {
            Self::Google => "https://translate.googleapis.com",
            Self::OpenAi => "http://localhost:8080/v1",
            Self::Offline => "",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::Offline => "offline",
        };
        f.write_str(name)
    }
}

/// Translator backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Base URL; falls back to the backend's default when unset
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslatorConfig {
    /// Create a new translator config
    pub fn new(backend: Backend, api_base: Option<String>, api_key: Option<String>) -> Self {
        Self {
            backend,
            api_base,
            api_key,
            ..Self::default()
        }
    }

    /// Base URL to use, resolving the backend default.
    pub fn resolved_api_base(&self) -> String {
        self.api_base
            .clone()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| self.backend.default_api_base().to_string())
    }
}

fn default_model() -> String {
    "default_model".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_base: None,
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chunking and per-request translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Maximum characters per chunk sent to the provider
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Courtesy delay before each provider call, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Apply the phrase dictionary to the text before sending it
    #[serde(default = "default_true")]
    pub prenormalize: bool,

    /// Phrase dictionary file (TOML); the built-in table is used when unset
    pub dictionary_path: Option<PathBuf>,
}

const fn default_max_chunk_chars() -> usize {
    3000
}

const fn default_request_delay_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            request_delay_ms: default_request_delay_ms(),
            prenormalize: true,
            dictionary_path: None,
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Render the French original above each translation
    #[serde(default = "default_true")]
    pub include_original: bool,

    /// Directory the generated document is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Font for Latin-script runs
    #[serde(default = "FontSpec::default_latin")]
    pub latin_font: FontSpec,

    /// Font for right-to-left script runs
    #[serde(default = "FontSpec::default_rtl")]
    pub rtl_font: FontSpec,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("translations")
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            include_original: true,
            output_dir: default_output_dir(),
            latin_font: FontSpec::default_latin(),
            rtl_font: FontSpec::default_rtl(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source language
    #[serde(default = "default_source_lang")]
    pub source_lang: Lang,

    /// Target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Translator backend configuration
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Chunking and request pacing
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Output document layout
    #[serde(default)]
    pub document: DocumentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            translator: TranslatorConfig::default(),
            translation: TranslationConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, crate::error::Error> {
        let config: Self = toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.translation.max_chunk_chars == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "translation.max_chunk_chars".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        for (field, font) in [
            ("document.latin_font", &self.document.latin_font),
            ("document.rtl_font", &self.document.rtl_font),
        ] {
            if font.family.trim().is_empty() || font.size_pt == 0 {
                return Err(crate::error::Error::ConfigInvalid {
                    field: field.to_string(),
                    reason: "font needs a family and a non-zero size".to_string(),
                });
            }
            if font.size_pt > MAX_FONT_SIZE_PT {
                return Err(crate::error::Error::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("font size must be at most {MAX_FONT_SIZE_PT} pt"),
                });
            }
        }
        Ok(())
    }

    /// Load from default locations (~/.config/docx-translator/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("docx-translator").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

/// Default source language code
pub const DEFAULT_SOURCE_LANG: &str = "fr";
/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "fa";

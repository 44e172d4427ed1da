//! DOCX Translator Core Library
//!
//! This library turns French text into a bilingual Word document with Farsi
//! translations laid out right-to-left:
//! - Sentence-aligned chunking
//! - Translation via Google Translate or OpenAI-compatible APIs
//! - Dictionary overlay for pre-normalization and offline fallback
//! - Document assembly and `.docx` serialization

pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod service;
pub mod text;
pub mod translator;
pub mod util;

pub use config::{
    AppConfig, Backend, DocumentConfig, Lang, TranslationConfig, TranslatorConfig,
    DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG,
};
pub use dictionary::PhraseDictionary;
pub use document::{DocumentAssembler, DocumentModel, DocxWriter, FontSpec, FormattingOutcome};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineOutput, output_file_name};
pub use service::{TranslationMethod, TranslationPair, TranslationService};
pub use text::{Chunk, split};
pub use translator::{Translator, create_translator};

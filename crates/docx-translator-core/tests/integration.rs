//! Integration tests for docx-translator-core
//!
//! These tests verify the end-to-end workflow:
//! - Sentence chunking
//! - Translation with mock backend and dictionary fallback
//! - Document assembly with right-to-left formatting
//! - `.docx` package output

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docx_translator_core::{
    AppConfig, Backend, DocumentAssembler, Error, Lang, PhraseDictionary, Pipeline, Result,
    TranslationMethod, TranslationService, Translator, TranslatorConfig, create_translator,
    document::ParagraphRole, split, translator::TranslatorInfo,
};

// =============================================================================
// Mock Translator for Testing
// =============================================================================

enum Behavior {
    Prefix(&'static str),
    Fail,
    Empty,
}

/// A mock translator that answers predictably without network calls.
struct MockTranslator {
    behavior: Behavior,
}

impl MockTranslator {
    fn new() -> Self {
        Self {
            behavior: Behavior::Prefix("[FA]"),
        }
    }

    fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
        }
    }

    fn empty() -> Self {
        Self {
            behavior: Behavior::Empty,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source: &Lang, _target: &Lang) -> Result<String> {
        match self.behavior {
            Behavior::Prefix(prefix) => Ok(format!("{prefix} {text}")),
            Behavior::Fail => Err(Error::TranslationRequest("Mock translation failure".to_string())),
            Behavior::Empty => Ok(String::new()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn info(&self) -> TranslatorInfo {
        TranslatorInfo { name: "mock" }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

fn test_service(translator: MockTranslator) -> TranslationService {
    TranslationService::new(
        Arc::new(translator),
        Arc::new(PhraseDictionary::french_farsi()),
        Lang::new("fr"),
        Lang::new("fa"),
    )
    .with_request_delay(Duration::ZERO)
}

fn read_part(path: &std::path::Path, name: &str) -> String {
    let file = std::fs::File::open(path).expect("Failed to open output");
    let mut archive = zip::ZipArchive::new(file).expect("Output is not a zip package");
    let mut content = String::new();
    archive
        .by_name(name)
        .expect("Missing package part")
        .read_to_string(&mut content)
        .expect("Part is not UTF-8");
    content
}

// =============================================================================
// Chunking Tests
// =============================================================================

#[test]
fn test_short_sentences_merge_into_one_chunk() {
    let chunks = split("Bonjour. Comment ça va?", 4000);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Bonjour Comment ça va");
    assert_eq!(chunks[0].index, 1);
}

#[test]
fn test_oversized_sentences_are_not_truncated() {
    let chunks = split("Bonjour. Comment allez-vous aujourd'hui?", 10);
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Bonjour", "Comment allez-vous aujourd'hui"]);
    assert!(chunks[1].char_count > 10);
}

// =============================================================================
// Translation Service Tests
// =============================================================================

#[tokio::test]
async fn test_failed_provider_uses_dictionary() {
    let chunks = split("Bonjour. Comment ça va?", 4000);
    let pairs = test_service(MockTranslator::failing())
        .translate_all(&chunks)
        .await;

    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].translated.contains("سلام"));
    assert!(pairs[0].translated.contains("خوبم"));
    assert_eq!(pairs[0].original, "Bonjour Comment ça va");
    assert_eq!(pairs[0].method, TranslationMethod::Dictionary);
}

#[tokio::test]
async fn test_one_pair_per_chunk_when_everything_fails() {
    let text = "Merci. Oui. Non. Peut-être demain. Au revoir!";
    let chunks = split(text, 1);
    assert_eq!(chunks.len(), 5);

    let service = test_service(MockTranslator::failing());
    let pairs = service.translate_all(&chunks).await;

    assert_eq!(pairs.len(), chunks.len());
    for (pair, chunk) in pairs.iter().zip(&chunks) {
        assert_eq!(pair.chunk_index, chunk.index);
        assert_eq!(pair.original, chunk.text);
        assert_eq!(
            pair.translated,
            docx_translator_core::overlay::apply(&chunk.text, service.dictionary())
        );
        assert!(pair.used_fallback());
    }
}

#[tokio::test]
async fn test_empty_provider_answer_uses_dictionary() {
    let chunks = split("Merci beaucoup", 100);
    let pairs = test_service(MockTranslator::empty())
        .translate_all(&chunks)
        .await;
    assert_eq!(pairs[0].translated, "بسیار متشکرم");
}

#[tokio::test]
async fn test_provider_receives_prenormalized_text() {
    let chunks = split("Bonjour Paris", 100);
    let pairs = test_service(MockTranslator::new()).translate_all(&chunks).await;
    assert_eq!(pairs[0].translated, "[FA] سلام Paris");
    assert_eq!(pairs[0].method, TranslationMethod::Provider);
}

#[tokio::test]
async fn test_custom_dictionary_is_injected() {
    let dictionary = PhraseDictionary::from_toml_str(
        r#"
        [[phrase]]
        source = "chat"
        target = "گربه"
        "#,
    )
    .unwrap();
    let service = TranslationService::new(
        Arc::new(MockTranslator::failing()),
        Arc::new(dictionary),
        Lang::new("fr"),
        Lang::new("fa"),
    )
    .with_request_delay(Duration::ZERO);

    let out = service.translate(&split("Le chat. Bonjour", 100)[0]).await;
    assert_eq!(out, "Le گربه Bonjour");
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_pipeline_writes_rtl_docx() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(
        test_service(MockTranslator::failing()),
        DocumentAssembler::default(),
        4000,
        true,
        dir.path().join("out"),
    )
    .with_source_name("lettre.txt");

    let output = pipeline.run("Bonjour. Comment ça va?", None).await.unwrap();

    assert!(output.output_path.exists());
    assert_eq!(output.pairs.len(), 1);
    assert_eq!(output.fallback_count(), 1);

    let file_name = output.output_path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("french_farsi_translation_"));
    assert!(file_name.ends_with(".docx"));
    assert_eq!(file_name.len(), "french_farsi_translation_YYYYMMDD_HHMMSS.docx".len());

    let body = read_part(&output.output_path, "word/document.xml");
    assert!(body.contains("<w:bidi/>"));
    assert!(body.contains("سلام"));
    assert!(body.contains("خوبم"));
    assert!(body.contains("Bonjour Comment ça va"));
    assert!(body.contains("lettre.txt"));

    let styles = read_part(&output.output_path, "word/styles.xml");
    assert!(styles.contains(r#"w:styleId="Farsi""#));
}

#[tokio::test]
async fn test_pipeline_reports_progress() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(
        test_service(MockTranslator::new()),
        DocumentAssembler::default(),
        1,
        false,
        dir.path(),
    );

    let calls = std::sync::Mutex::new(Vec::new());
    let report = |done: usize, total: usize| calls.lock().unwrap().push((done, total));
    let output = pipeline.run("Un. Deux. Trois.", Some(&report)).await.unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(output.fallback_count(), 0);

    let body = read_part(&output.output_path, "word/document.xml");
    assert!(!body.contains("متن اصلی (فرانسه):"));
    assert!(body.contains("[FA] Trois"));
}

#[tokio::test]
async fn test_metadata_date_matches_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(
        test_service(MockTranslator::failing()),
        DocumentAssembler::default(),
        3000,
        true,
        dir.path(),
    );

    let output = pipeline.run("Merci.", None).await.unwrap();

    // french_farsi_translation_YYYYMMDD_HHMMSS.docx
    let file_name = output.output_path.file_name().unwrap().to_str().unwrap();
    let stamp = &file_name["french_farsi_translation_".len()..][..8];
    let date = format!("{}/{}/{}", &stamp[..4], &stamp[4..6], &stamp[6..]);

    let body = read_part(&output.output_path, "word/document.xml");
    assert!(body.contains(&format!("تاریخ ترجمه: {date}")));
}

#[tokio::test]
async fn test_empty_input_still_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(
        test_service(MockTranslator::new()),
        DocumentAssembler::default(),
        3000,
        true,
        dir.path(),
    );

    let output = pipeline.run("   ", None).await.unwrap();
    assert!(output.pairs.is_empty());
    assert!(output.output_path.exists());
}

#[tokio::test]
async fn test_pipeline_from_config_with_offline_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.translator = TranslatorConfig::new(Backend::Offline, None, None);
    config.document.output_dir = dir.path().to_path_buf();

    let translator = create_translator(&config.translator).unwrap();
    let service = TranslationService::from_config(
        &config,
        translator,
        Arc::new(PhraseDictionary::french_farsi()),
    );
    let pipeline = Pipeline::from_config(&config, service);

    let output = pipeline.run("Merci. Au revoir!", None).await.unwrap();
    assert_eq!(output.pairs[0].translated, "متشکرم خداحافظ");
    assert!(output.output_path.starts_with(dir.path()));
}

// =============================================================================
// Document Tests
// =============================================================================

#[tokio::test]
async fn test_every_farsi_section_is_rtl() {
    let chunks = split("Bonjour. Merci. Non.", 1);
    let pairs = test_service(MockTranslator::failing())
        .translate_all(&chunks)
        .await;
    let doc = DocumentAssembler::default().assemble("Bonjour. Merci. Non.", &pairs, true);

    assert_eq!(doc.rtl_violations().count(), 0);
    assert_eq!(doc.paragraphs_with_role(ParagraphRole::Translation).count(), 3);
    assert!(
        doc.paragraphs_with_role(ParagraphRole::Original)
            .all(|p| !p.is_rtl())
    );
}

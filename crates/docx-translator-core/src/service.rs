//! Per-chunk translation with dictionary fallback.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{AppConfig, Lang};
use crate::dictionary::PhraseDictionary;
use crate::overlay;
use crate::text::Chunk;
use crate::translator::Translator;

/// Where a translation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMethod {
    /// The remote provider answered with non-empty text
    Provider,
    /// The provider failed, was unavailable or returned nothing
    Dictionary,
}

/// A source chunk and its translation, in chunk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPair {
    pub chunk_index: usize,
    pub original: String,
    pub translated: String,
    pub method: TranslationMethod,
}

impl TranslationPair {
    pub fn used_fallback(&self) -> bool {
        self.method == TranslationMethod::Dictionary
    }
}

/// Translates chunks one at a time, in order, never failing.
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    dictionary: Arc<PhraseDictionary>,
    source_lang: Lang,
    target_lang: Lang,
    request_delay: Duration,
    prenormalize: bool,
}

impl TranslationService {
    /// Create a service with the default pacing (1 s delay, pre-normalization on)
    pub fn new(
        translator: Arc<dyn Translator>,
        dictionary: Arc<PhraseDictionary>,
        source_lang: Lang,
        target_lang: Lang,
    ) -> Self {
        Self {
            translator,
            dictionary,
            source_lang,
            target_lang,
            request_delay: Duration::from_secs(1),
            prenormalize: true,
        }
    }

    /// Create a service from application configuration
    pub fn from_config(
        config: &AppConfig,
        translator: Arc<dyn Translator>,
        dictionary: Arc<PhraseDictionary>,
    ) -> Self {
        Self::new(
            translator,
            dictionary,
            config.source_lang.clone(),
            config.target_lang.clone(),
        )
        .with_request_delay(Duration::from_millis(config.translation.request_delay_ms))
        .with_prenormalize(config.translation.prenormalize)
    }

    /// Set the courtesy wait before each provider call
    #[must_use]
    pub const fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Toggle the dictionary pass on text sent to the provider
    #[must_use]
    pub const fn with_prenormalize(mut self, enabled: bool) -> Self {
        self.prenormalize = enabled;
        self
    }

    pub fn translator_name(&self) -> &'static str {
        self.translator.name()
    }

    pub fn dictionary(&self) -> &PhraseDictionary {
        &self.dictionary
    }

    /// Translated text for one chunk
    pub async fn translate(&self, chunk: &Chunk) -> String {
        self.translate_chunk(chunk).await.translated
    }

    /// Translate one chunk, falling back to the dictionary on any provider
    /// failure or empty result.
    pub async fn translate_chunk(&self, chunk: &Chunk) -> TranslationPair {
        let pair = |translated: String, method| TranslationPair {
            chunk_index: chunk.index,
            original: chunk.text.clone(),
            translated,
            method,
        };

        if !self.translator.is_available() {
            debug!(
                "{} unavailable, using dictionary for chunk {}",
                self.translator.name(),
                chunk.index
            );
            return pair(self.fallback(chunk), TranslationMethod::Dictionary);
        }

        let request_text = if self.prenormalize {
            overlay::apply(&chunk.text, &self.dictionary)
        } else {
            chunk.text.clone()
        };

        // Rate limiting courtesy wait
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        match self
            .translator
            .translate(&request_text, &self.source_lang, &self.target_lang)
            .await
        {
            Ok(translated) if !translated.trim().is_empty() => {
                pair(translated, TranslationMethod::Provider)
            }
            Ok(_) => {
                warn!(
                    "{} returned an empty translation for chunk {}, using dictionary",
                    self.translator.name(),
                    chunk.index
                );
                pair(self.fallback(chunk), TranslationMethod::Dictionary)
            }
            Err(e) => {
                warn!(
                    "Translation error for chunk {}: {}, using dictionary",
                    chunk.index, e
                );
                pair(self.fallback(chunk), TranslationMethod::Dictionary)
            }
        }
    }

    /// Translate every chunk in order
    pub async fn translate_all(&self, chunks: &[Chunk]) -> Vec<TranslationPair> {
        self.translate_all_with_progress(chunks, None).await
    }

    /// Translate every chunk in order, reporting `(done, total)` after each
    pub async fn translate_all_with_progress(
        &self,
        chunks: &[Chunk],
        progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
    ) -> Vec<TranslationPair> {
        let total = chunks.len();
        let mut pairs = Vec::with_capacity(total);

        for chunk in chunks {
            info!("Translating chunk {}/{}", chunk.index, total);
            pairs.push(self.translate_chunk(chunk).await);

            if let Some(callback) = progress {
                callback(pairs.len(), total);
            }
        }

        pairs
    }

    fn fallback(&self, chunk: &Chunk) -> String {
        overlay::apply(&chunk.text, &self.dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::error::{Error, Result};
    use crate::text;
    use crate::translator::TranslatorInfo;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the text it receives and answers from a script.
    struct ScriptedTranslator {
        answers: Mutex<Vec<Result<String>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedTranslator {
        fn new(answers: Vec<Result<String>>) -> Self {
            Self {
                answers: Mutex::new(answers),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Translator for ScriptedTranslator {
        fn info(&self) -> TranslatorInfo {
            TranslatorInfo { name: "scripted" }
        }

        async fn translate(&self, text: &str, _source: &Lang, _target: &Lang) -> Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            self.answers.lock().unwrap().remove(0)
        }
    }

    fn service(translator: Arc<dyn Translator>) -> TranslationService {
        TranslationService::new(
            translator,
            Arc::new(PhraseDictionary::french_farsi()),
            Lang::new("fr"),
            Lang::new("fa"),
        )
        .with_request_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_neighbours() {
        let translator = Arc::new(ScriptedTranslator::new(vec![
            Ok("یک".to_string()),
            Err(Error::TranslationTimeout),
            Ok("سه".to_string()),
        ]));
        let chunks = text::split("Un. Merci. Trois.", 1);
        let pairs = service(translator).translate_all(&chunks).await;

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].translated, "یک");
        assert_eq!(pairs[1].translated, "متشکرم");
        assert!(pairs[1].used_fallback());
        assert_eq!(pairs[2].translated, "سه");
        assert_eq!(pairs[2].method, TranslationMethod::Provider);
    }

    #[tokio::test]
    async fn test_whitespace_result_falls_back() {
        let translator = Arc::new(ScriptedTranslator::new(vec![Ok("  \n".to_string())]));
        let chunk = &text::split("Oui", 100)[0];
        let pair = service(translator).translate_chunk(chunk).await;
        assert_eq!(pair.translated, "بله");
        assert_eq!(pair.method, TranslationMethod::Dictionary);
    }

    #[tokio::test]
    async fn test_prenormalized_text_is_sent() {
        let translator = Arc::new(ScriptedTranslator::new(vec![
            Ok("x".to_string()),
            Ok("y".to_string()),
        ]));
        let chunk = &text::split("Bonjour Marie", 100)[0];

        service(translator.clone()).translate_chunk(chunk).await;
        service(translator.clone())
            .with_prenormalize(false)
            .translate_chunk(chunk)
            .await;

        let seen = translator.seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["سلام Marie".to_string(), "Bonjour Marie".to_string()]);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_not_called() {
        let config = AppConfig {
            translator: crate::config::TranslatorConfig::new(Backend::Offline, None, None),
            ..Default::default()
        };
        let translator = crate::translator::create_translator(&config.translator).unwrap();
        let service = TranslationService::from_config(
            &config,
            translator,
            Arc::new(PhraseDictionary::french_farsi()),
        );

        // The configured 1 s delay is skipped for an unavailable provider
        let started = std::time::Instant::now();
        let out = service.translate(&text::split("Merci beaucoup", 100)[0]).await;
        assert_eq!(out, "بسیار متشکرم");
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_progress_reports_each_chunk() {
        let translator = Arc::new(ScriptedTranslator::new(vec![
            Ok("a".to_string()),
            Ok("b".to_string()),
        ]));
        let chunks = text::split("Un. Deux.", 1);
        let seen = Mutex::new(Vec::new());
        let report = |done: usize, total: usize| seen.lock().unwrap().push((done, total));

        service(translator)
            .translate_all_with_progress(&chunks, Some(&report))
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }
}

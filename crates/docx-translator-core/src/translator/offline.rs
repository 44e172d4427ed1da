use async_trait::async_trait;

use crate::config::Lang;
use crate::error::{Error, Result};
use super::traits::{Translator, TranslatorInfo};

/// Backend with no remote provider.
///
/// Reports itself unavailable, so the translation service goes straight to
/// the dictionary overlay without waiting out the request delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineTranslator;

#[async_trait]
impl Translator for OfflineTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo { name: "Offline dictionary" }
    }

    async fn translate(&self, _text: &str, _source: &Lang, _target: &Lang) -> Result<String> {
        Err(Error::TranslationRequest("offline backend has no provider".to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Lang;
use crate::error::{Error, Result};
use super::traits::{Translator, TranslatorInfo};
use super::http_client;

/// Google Translate through the public `translate_a/single` web endpoint.
///
/// No API key is needed. The endpoint answers with a nested JSON array; the
/// first element lists translated segments as `[translated, original, ...]`.
pub struct GoogleTranslator {
    client: Client,
    /// Base URL (e.g., "https://translate.googleapis.com")
    pub api_base: String,
}

impl GoogleTranslator {
    pub fn new(api_base: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_base,
        }
    }

    fn request_url(&self, text: &str, source: &Lang, target: &Lang) -> String {
        format!(
            "{}/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(source.as_str()),
            urlencoding::encode(target.as_str()),
            urlencoding::encode(text),
        )
    }
}

/// Join the translated segments of a `translate_a/single` response.
pub(crate) fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::TranslationInvalidResponse(format!("not JSON: {e}")))?;

    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::TranslationInvalidResponse("missing segment list".to_string()))?;

    let mut translated = String::new();
    for segment in segments {
        // Trailing transliteration segments carry null in the first slot
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }

    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo { name: "Google Translate" }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let url = self.request_url(text, source, target);
        debug!("Translation request to {}", self.api_base);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            if e.is_timeout() {
                Error::TranslationTimeout
            } else {
                Error::TranslationRequest(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            warn!("Rate limited, retry after {:?}s", retry_after);
            return Err(Error::TranslationRateLimited { retry_after });
        }
        if !status.is_success() {
            warn!("API error: {}", status);
            return Err(Error::TranslationRequest(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::TranslationInvalidResponse(e.to_string()))?;

        parse_response(&body)
    }
}

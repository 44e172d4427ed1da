use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Lang;
use crate::error::{Error, Result};
use super::traits::{Translator, TranslatorInfo};
use super::http_client;

/// OpenAI-compatible API translator
/// Works with: llama.cpp server, Ollama, DeepSeek, OpenAI, etc.
pub struct OpenAiTranslator {
    client: Client,
    /// Base URL for the API (e.g., "http://localhost:8080/v1")
    pub api_base: String,
    /// Optional API key for authentication
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenAiTranslator {
    /// Create a new OpenAI translator.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created, which should only happen
    /// in extreme circumstances (e.g., TLS backend unavailable on the system).
    pub fn new(
        api_base: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            api_base,
            api_key,
            model,
        }
    }

    /// Create translation prompt
    fn create_prompt(text: &str, source: &Lang, target: &Lang) -> String {
        let source_hint = if source.as_str() == "auto" {
            String::new()
        } else {
            format!(" from {}", language_name(source))
        };
        let script_hint = if is_rtl_language(target) {
            " Write the result in its native right-to-left script."
        } else {
            ""
        };
        format!(
            "Translate the following text{} into {}. Output only the translation, no explanations.{}\n\nText: \"{}\"",
            source_hint,
            language_name(target),
            script_hint,
            text
        )
    }

    /// Send one chat completion request; no retries
    async fn request(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let prompt = Self::create_prompt(text, source, target);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: Some(0.3), // Lower temperature for more consistent translations
        };

        debug!("Translation request to {}", url);

        let mut req = self.client.post(&url).json(&request);

        // Add API key if configured
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.send().await.map_err(|e| {
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
        if status.as_u16() == 401 {
            return Err(Error::TranslationMissingApiKey);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error: {} - {}", status, body);
            return Err(Error::TranslationRequest(format!("HTTP {status}: {body}")));
        }

        let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
            warn!("Failed to parse response: {}", e);
            Error::TranslationInvalidResponse(e.to_string())
        })?;

        let choice = chat_response.choices.first().ok_or_else(|| {
            Error::TranslationInvalidResponse("No choices in response".to_string())
        })?;

        // Remove quotes if the model wrapped the response
        Ok(choice
            .message
            .content
            .trim()
            .trim_start_matches('"')
            .trim_end_matches('"')
            .to_string())
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo { name: "OpenAI Compatible" }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        // Skip empty text
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        // Skip if source and target are the same
        if source.as_str() == target.as_str() && source.as_str() != "auto" {
            return Ok(text.to_string());
        }

        self.request(text, source, target).await
    }

    fn is_available(&self) -> bool {
        // For local servers, we don't require an API key
        !self.api_base.trim().is_empty()
    }
}

/// Convert language code to human-readable name for prompts
fn language_name(lang: &Lang) -> &'static str {
    match lang.as_str() {
        "en" => "English",
        "fa" => "Persian (Farsi)",
        "ar" => "Arabic",
        "ur" => "Urdu",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "tr" => "Turkish",
        // For unknown languages, the LLM should still understand most ISO codes
        _ => "the specified language",
    }
}

fn is_rtl_language(lang: &Lang) -> bool {
    matches!(lang.as_str(), "fa" | "ar" | "ur" | "he" | "ps")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_name() {
        assert_eq!(language_name(&Lang::new("fa")), "Persian (Farsi)");
        assert_eq!(language_name(&Lang::new("fr")), "French");
        assert_eq!(language_name(&Lang::new("unknown")), "the specified language");
    }

    #[test]
    fn test_prompt_mentions_script_for_farsi() {
        let prompt =
            OpenAiTranslator::create_prompt("Bonjour", &Lang::new("fr"), &Lang::new("fa"));
        assert!(prompt.contains("from French into Persian (Farsi)"));
        assert!(prompt.contains("right-to-left"));
        assert!(prompt.ends_with("Text: \"Bonjour\""));

        let prompt =
            OpenAiTranslator::create_prompt("Hallo", &Lang::new("auto"), &Lang::new("en"));
        assert!(!prompt.contains(" from "));
        assert!(!prompt.contains("right-to-left"));
    }

    #[tokio::test]
    async fn test_same_language_short_circuits() {
        let translator = OpenAiTranslator::new(
            "http://127.0.0.1:9".to_string(),
            None,
            "m".to_string(),
            Duration::from_secs(1),
        );
        let out = translator
            .translate("Bonjour", &Lang::new("fr"), &Lang::new("fr"))
            .await
            .unwrap();
        assert_eq!(out, "Bonjour");
    }
}

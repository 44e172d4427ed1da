mod traits;
mod google;
mod offline;
mod openai;

pub use traits::{Translator, TranslatorInfo};
pub use google::GoogleTranslator;
pub use offline::OfflineTranslator;
pub use openai::OpenAiTranslator;

use crate::config::{Backend, TranslatorConfig};
use crate::error::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Create a translator from configuration
pub fn create_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let translator: Arc<dyn Translator> = match config.backend {
        Backend::Google => Arc::new(GoogleTranslator::new(config.resolved_api_base(), timeout)),
        Backend::OpenAi => Arc::new(OpenAiTranslator::new(
            config.resolved_api_base(),
            config.api_key.clone(),
            config.model.clone(),
            timeout,
        )),
        Backend::Offline => Arc::new(OfflineTranslator),
    };

    Ok(translator)
}

/// Build the shared HTTP client; request timeouts surface as provider errors.
///
/// # Panics
/// Panics if the HTTP client cannot be created, which should only happen
/// in extreme circumstances (e.g., TLS backend unavailable on the system).
#[allow(clippy::expect_used)]
fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

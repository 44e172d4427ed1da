use thiserror::Error;

/// Unified error type for docx-translator-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Translation operations (API requests, responses, rate limiting)
/// - Phrase dictionary loading
/// - Document serialization
/// - Configuration operations (loading, validation)
/// - General I/O operations
///
/// Translation errors never escape the translation service: they trigger the
/// dictionary fallback. Every other variant is fatal for a pipeline run.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// Translation API request failed
    #[error("translation API request failed: {0}")]
    TranslationRequest(String),

    /// Invalid response from translation API
    #[error("invalid translation API response: {0}")]
    TranslationInvalidResponse(String),

    /// Rate limited by translation API
    #[error("translation rate limited{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    TranslationRateLimited { retry_after: Option<u64> },

    /// API key not configured for translation service
    #[error("translation API key not configured")]
    TranslationMissingApiKey,

    /// Translation request timed out
    #[error("translation request timed out")]
    TranslationTimeout,

    // ==========================================================================
    // Dictionary Errors
    // ==========================================================================
    /// Failed to read or parse a phrase dictionary file
    #[error("failed to load phrase dictionary: {0}")]
    DictionaryLoad(String),

    /// A dictionary entry cannot be used for matching
    #[error("invalid dictionary entry '{source_phrase}': {reason}")]
    DictionaryEntry { source_phrase: String, reason: String },

    // ==========================================================================
    // Document Errors
    // ==========================================================================
    /// Failed to serialize the document package
    #[error("failed to write document: {0}")]
    DocumentWrite(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message() {
        let with = Error::TranslationRateLimited { retry_after: Some(7) };
        let without = Error::TranslationRateLimited { retry_after: None };
        assert_eq!(with.to_string(), "translation rate limited, retry after 7 seconds");
        assert_eq!(without.to_string(), "translation rate limited");
    }
}

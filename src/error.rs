//! Failure kinds surfaced by a translate call.

use thiserror::Error;

/// Why a translation could not be produced.
///
/// Support-list failures never show up here: they resolve to "not supported"
/// and are observed through `TranslationService::is_available`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The provider rejected the credentials (HTTP 401).
    #[error("Translation provider rejected the API key, check configuration")]
    ConfigurationInvalid,

    /// HTTP 429 or 403. Retry later.
    #[error("Translation service over limit, try again later")]
    QuotaExceeded,

    /// Provider error status, malformed response, or transport failure.
    #[error("Translation service is currently not available: {0}")]
    ProviderUnavailable(String),

    /// The active locale is not in the provider's catalog. No request was made.
    #[error("Language '{0}' is not supported by the translation service")]
    LocaleNotSupported(String),
}

impl TranslateError {
    /// Whether the same call may succeed later without any change on our side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }
}

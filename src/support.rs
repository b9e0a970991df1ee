//! Locale support checks against the provider catalog.

use crate::config::ProviderConfig;
use crate::metrics::TranslationMetrics;
use crate::provider;
use std::sync::Arc;
use tracing::{error, info};

/// Answers "can the provider translate into this locale right now?".
///
/// Holds only shared handles; the answer itself is stored by the caller.
#[derive(Debug, Clone)]
pub struct SupportCache {
    client: reqwest::Client,
    config: Arc<ProviderConfig>,
    metrics: Arc<TranslationMetrics>,
}

impl SupportCache {
    /// Share `client`, `config` and `metrics` with the owning service.
    pub fn new(
        client: reqwest::Client,
        config: Arc<ProviderConfig>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        Self {
            client,
            config,
            metrics,
        }
    }

    /// Run a fresh support check for `locale`.
    ///
    /// Fail-closed: an unreachable provider or unreadable catalog means `false`.
    pub async fn refresh(&self, locale: &str) -> bool {
        self.metrics.record_support_check();

        match provider::list_supported_languages(&self.client, &self.config).await {
            Ok(languages) => {
                let supported = languages.contains(locale);
                info!(
                    "Language '{}' is {}supported by the translation service",
                    locale,
                    if supported { "" } else { "not " }
                );
                supported
            }
            Err(e) => {
                self.metrics.record_support_check_failure();
                error!("Error getting supported languages: {:#}", e);
                false
            }
        }
    }
}

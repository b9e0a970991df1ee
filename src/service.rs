//! Translation into the host's active locale.
//!
//! [`TranslationService`] checks once at startup whether the provider supports
//! the active locale, re-checks on every locale-change notification, and gates
//! `translate` calls on the cached answer.

use crate::config::ProviderConfig;
use crate::error::TranslateError;
use crate::locale::{LocaleDetector, LocaleEventBridge, LocaleNotifier};
use crate::metrics::{MetricsReport, TranslationMetrics};
use crate::provider;
use crate::support::SupportCache;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The active locale paired with the support answer computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceState {
    pub current_locale: String,
    pub is_supported: bool,
    /// When the support check that produced `is_supported` completed
    pub checked_at: DateTime<Utc>,
}

impl ServiceState {
    fn new(current_locale: String, is_supported: bool) -> Self {
        Self {
            current_locale,
            is_supported,
            checked_at: Utc::now(),
        }
    }
}

/// Translates text into the host's active locale, gated on a cached support check.
///
/// Cheap to share behind an `Arc`; reads never wait on a refresh in progress.
pub struct TranslationService {
    client: reqwest::Client,
    config: Arc<ProviderConfig>,
    support: SupportCache,
    detector: Arc<dyn LocaleDetector>,
    /// Replaced whole, never edited in place
    state: RwLock<Arc<ServiceState>>,
    /// Serializes support checks that write `state`
    refresh_lock: Mutex<()>,
    bridge: LocaleEventBridge,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationService {
    /// Validate `config`, build an HTTP client with its timeout and start the service.
    pub async fn start(
        config: ProviderConfig,
        detector: Arc<dyn LocaleDetector>,
        notifier: LocaleNotifier,
    ) -> Result<Arc<Self>> {
        config.validate()?;
        let client = config.build_http_client()?;
        Ok(Self::with_client(client, config, detector, notifier).await)
    }

    /// Start the service on an existing HTTP client.
    ///
    /// Awaits the initial support check, then registers for locale changes.
    pub async fn with_client(
        client: reqwest::Client,
        config: ProviderConfig,
        detector: Arc<dyn LocaleDetector>,
        notifier: LocaleNotifier,
    ) -> Arc<Self> {
        let config = Arc::new(config);
        let metrics = Arc::new(TranslationMetrics::new());
        let support = SupportCache::new(client.clone(), Arc::clone(&config), Arc::clone(&metrics));

        let locale = detector.current_locale();
        let is_supported = support.refresh(&locale).await;
        info!(
            "Translation service started for '{}' (available: {})",
            locale, is_supported
        );

        let service = Arc::new(Self {
            client,
            config,
            support,
            detector,
            state: RwLock::new(Arc::new(ServiceState::new(locale, is_supported))),
            refresh_lock: Mutex::new(()),
            bridge: LocaleEventBridge::new(notifier),
            metrics,
        });

        let weak = Arc::downgrade(&service);
        service.bridge.subscribe(move || {
            let weak = weak.clone();
            async move {
                if let Some(service) = weak.upgrade() {
                    service.refresh().await;
                }
            }
        });

        service
    }

    /// Translate `text` into the active locale.
    ///
    /// Fails with `LocaleNotSupported` without touching the network when the
    /// last support check was negative.
    pub async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let state = self.state();

        if !state.is_supported {
            self.metrics.record_gated_call();
            debug!(
                "Skipping translation: '{}' is not supported",
                state.current_locale
            );
            return Err(TranslateError::LocaleNotSupported(
                state.current_locale.clone(),
            ));
        }

        self.metrics.record_api_call();
        let result =
            provider::translate_text(&self.client, &self.config, text, &state.current_locale)
                .await;
        if result.is_err() {
            self.metrics.record_api_failure();
        }
        result
    }

    /// Cached support answer for the active locale. Never touches the network.
    pub fn is_available(&self) -> bool {
        self.state().is_supported
    }

    /// Locale that `translate` currently targets.
    pub fn current_locale(&self) -> String {
        self.state().current_locale.clone()
    }

    /// Consistent snapshot of the locale and its support answer.
    pub fn state(&self) -> Arc<ServiceState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Re-read the active locale and re-run the support check.
    ///
    /// This is what a locale-change notification triggers. Concurrent calls
    /// run one after another; the last one to finish is what readers see.
    pub async fn refresh(&self) -> Arc<ServiceState> {
        let _guard = self.refresh_lock.lock().await;

        let locale = self.detector.current_locale();
        info!("Locale changed, new language: {}", locale);

        let is_supported = self.support.refresh(&locale).await;
        let next = Arc::new(ServiceState::new(locale, is_supported));

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        next
    }

    /// Snapshot of this service's counters.
    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Whether locale-change notifications still reach this service.
    pub fn is_listening(&self) -> bool {
        self.bridge.is_subscribed()
    }

    /// Stop reacting to locale changes. Also happens on drop.
    pub fn shutdown(&self) {
        self.bridge.unsubscribe();
        info!("{}", self.metrics.report().format_log());
    }
}

//! Runtime translation of text into the host's active locale.
//!
//! # Architecture
//!
//! - `config`: provider connection parameters loaded from the environment
//! - `provider`: the two HTTP operations (supported languages, translate)
//! - `support`: fail-closed support check for one locale
//! - `locale`: active-locale detection and locale-change notifications
//! - `service`: the `TranslationService` facade tying the above together
//! - `error`: failure kinds returned by `translate`
//! - `metrics`: per-service counters
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_translator::{LocaleNotifier, ProviderConfig, SystemLocaleDetector, TranslationService};
//!
//! let notifier = LocaleNotifier::new();
//! let service = TranslationService::start(
//!     ProviderConfig::from_env()?,
//!     Arc::new(SystemLocaleDetector),
//!     notifier.clone(),
//! )
//! .await?;
//!
//! if service.is_available() {
//!     let text = service.translate("Hello").await?;
//! }
//!
//! // Host reports a locale change
//! notifier.notify();
//! ```

pub mod config;
pub mod error;
pub mod locale;
pub mod metrics;
pub mod provider;
pub mod service;
pub mod support;

pub use config::ProviderConfig;
pub use error::TranslateError;
pub use locale::{FixedLocaleDetector, LocaleDetector, LocaleNotifier, SystemLocaleDetector};
pub use service::{ServiceState, TranslationService};

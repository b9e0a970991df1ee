//! Preview translation binary - checks locale support and translates one text
//!
//! Usage:
//!   cargo run --bin preview-translation -- "Text to translate"
//!   PREVIEW_LOCALE=fr cargo run --bin preview-translation -- "Hello"
//!
//! Required environment variables:
//! - TRANSLATION_API_ENDPOINT
//! - TRANSLATION_API_KEY
//!
//! Optional:
//! - TRANSLATION_API_VERSION (defaults to 3.0)
//! - TRANSLATION_API_REGION
//! - TRANSLATION_TIMEOUT_SECS (defaults to 10)
//! - PREVIEW_LOCALE (defaults to the system locale)

use anyhow::{bail, Context, Result};
use locale_translator::{
    FixedLocaleDetector, LocaleDetector, LocaleNotifier, ProviderConfig, SystemLocaleDetector,
    TranslateError, TranslationService,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_translator=info".parse()?),
        )
        .init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        bail!("Usage: preview-translation <text to translate>");
    }

    let config = ProviderConfig::from_env().context("Failed to load translation config")?;

    let detector: Arc<dyn LocaleDetector> = match std::env::var("PREVIEW_LOCALE") {
        Ok(locale) if !locale.trim().is_empty() => Arc::new(FixedLocaleDetector::new(locale)),
        _ => Arc::new(SystemLocaleDetector),
    };

    let service = TranslationService::start(config, detector, LocaleNotifier::new()).await?;
    let state = service.state();

    println!("\n{}", "=".repeat(60));
    println!("Locale:    {}", state.current_locale);
    println!("Available: {}", state.is_supported);
    println!("{}", "=".repeat(60));

    match service.translate(&text).await {
        Ok(translated) => println!("{}", translated),
        Err(TranslateError::LocaleNotSupported(locale)) => {
            warn!("Language '{}' is not supported, nothing to translate", locale)
        }
        Err(e) if e.is_retryable() => warn!("{}", e),
        Err(e) => {
            service.shutdown();
            return Err(e.into());
        }
    }

    service.shutdown();
    info!("Preview complete");
    Ok(())
}

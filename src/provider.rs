//! HTTP calls to the translation provider.
//!
//! Two stateless operations: list the supported languages, and translate one
//! text into one target language. Both share the caller's `reqwest::Client`
//! and an immutable [`ProviderConfig`].

use crate::config::ProviderConfig;
use crate::error::TranslateError;
use anyhow::{bail, Context, Result};
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, warn};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

/// GET /languages response. Only the keys of the `translation` scope are used;
/// descriptor values are skipped whatever their shape.
#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    translation: HashMap<String, IgnoredAny>,
}

#[derive(Debug, Serialize)]
struct TranslateRequestItem<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

/// One element of the POST /translate response array.
#[derive(Debug, Deserialize)]
struct TranslateResponseItem {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    text: String,
}

/// Locale codes the provider can translate into, as of one support-list call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedLanguageSet {
    codes: HashSet<String>,
}

impl SupportedLanguageSet {
    /// Whether `locale` is one of the provider's target languages.
    pub fn contains(&self, locale: &str) -> bool {
        self.codes.contains(locale)
    }

    /// Number of supported locale codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the catalog listed no languages at all.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SupportedLanguageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fetch the provider's catalog of translation target languages.
///
/// Transport, status and decode failures all come back as a plain error; the
/// caller decides what "could not determine support" means.
pub async fn list_supported_languages(
    client: &reqwest::Client,
    config: &ProviderConfig,
) -> Result<SupportedLanguageSet> {
    let response = client
        .get(format!("{}/languages", config.endpoint))
        .query(&[
            ("scope", "translation"),
            ("api-version", config.api_version.as_str()),
        ])
        .header("Content-type", "application/json")
        .send()
        .await
        .context("Failed to request supported languages")?;

    if !response.status().is_success() {
        bail!("Supported languages request failed ({})", response.status());
    }

    let languages: LanguagesResponse = response
        .json()
        .await
        .context("Failed to parse supported languages response")?;

    let supported: SupportedLanguageSet = languages.translation.into_keys().collect();
    if supported.is_empty() {
        warn!("Provider returned an empty translation language catalog");
    } else {
        debug!("Provider supports {} translation languages", supported.len());
    }

    Ok(supported)
}

/// Map a translate response status to a failure, or `None` when the body should be decoded.
pub fn classify_status(status: StatusCode) -> Option<TranslateError> {
    match status.as_u16() {
        401 => Some(TranslateError::ConfigurationInvalid),
        403 | 429 => Some(TranslateError::QuotaExceeded),
        400 | 500 | 503 => Some(TranslateError::ProviderUnavailable(format!(
            "provider returned {}",
            status
        ))),
        _ if status.is_success() => None,
        _ => Some(TranslateError::ProviderUnavailable(format!(
            "unexpected provider status {}",
            status
        ))),
    }
}

/// Translate `text` into `target_locale` with a single provider request.
pub async fn translate_text(
    client: &reqwest::Client,
    config: &ProviderConfig,
    text: &str,
    target_locale: &str,
) -> Result<String, TranslateError> {
    if target_locale.trim().is_empty() {
        return Err(TranslateError::ProviderUnavailable(
            "no target language".to_string(),
        ));
    }

    let body = [TranslateRequestItem { text }];
    let mut request = client
        .post(format!("{}/translate", config.endpoint))
        .query(&[
            ("to", target_locale),
            ("api-version", config.api_version.as_str()),
        ])
        .header(SUBSCRIPTION_KEY_HEADER, &config.api_key)
        .header("Content-type", "application/json")
        .json(&body);

    if let Some(region) = &config.api_region {
        request = request.header(SUBSCRIPTION_REGION_HEADER, region);
    }

    let response = request.send().await.map_err(|e| {
        warn!("Cannot connect to translation service: {}", e);
        TranslateError::ProviderUnavailable(format!("cannot connect to translation service: {}", e))
    })?;

    let status = response.status();
    if let Some(err) = classify_status(status) {
        match &err {
            TranslateError::ConfigurationInvalid => {
                error!("Translation API key is not valid ({}), check configuration", status)
            }
            _ => warn!("Translation to '{}' failed ({}): {}", target_locale, status, err),
        }
        return Err(err);
    }

    let items: Vec<TranslateResponseItem> = response.json().await.map_err(|e| {
        warn!("Failed to parse translation response: {}", e);
        TranslateError::ProviderUnavailable(format!("malformed translation response: {}", e))
    })?;

    let translated = first_translation(items).ok_or_else(|| {
        warn!("Translation response for '{}' contained no translations", target_locale);
        TranslateError::ProviderUnavailable("translation service error response".to_string())
    })?;

    debug!("Translated {} chars into '{}'", text.len(), target_locale);
    Ok(translated)
}

fn first_translation(items: Vec<TranslateResponseItem>) -> Option<String> {
    items
        .into_iter()
        .next()?
        .translations
        .into_iter()
        .next()
        .map(|t| t.text)
}

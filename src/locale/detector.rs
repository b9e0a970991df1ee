use std::sync::{PoisonError, RwLock};

/// Locale used when the host reports nothing usable.
const FALLBACK_LOCALE: &str = "en";

/// Source of the host's active display language.
pub trait LocaleDetector: Send + Sync {
    /// Primary language code of the active locale (e.g. "fr").
    fn current_locale(&self) -> String;
}

/// Reads the operating system locale via `sys-locale`.
#[derive(Debug, Default)]
pub struct SystemLocaleDetector;

impl LocaleDetector for SystemLocaleDetector {
    fn current_locale(&self) -> String {
        sys_locale::get_locale()
            .as_deref()
            .and_then(primary_language)
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
    }
}

/// Locale set explicitly by the host, for platforms that push locale changes themselves.
#[derive(Debug)]
pub struct FixedLocaleDetector {
    locale: RwLock<String>,
}

impl FixedLocaleDetector {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: RwLock::new(locale.into()),
        }
    }

    /// Replace the reported locale. Pair with `LocaleNotifier::notify`.
    pub fn set(&self, locale: impl Into<String>) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.into();
    }
}

impl LocaleDetector for FixedLocaleDetector {
    fn current_locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Reduce a locale tag such as `fr-FR`, `pt_BR.UTF-8` or `sr@latin` to its
/// lowercase language subtag.
pub fn primary_language(tag: &str) -> Option<String> {
    let language = tag.split(['-', '_', '.', '@']).next()?.trim();
    if language.is_empty() || language.eq_ignore_ascii_case("c") || language == "POSIX" {
        return None;
    }
    Some(language.to_ascii_lowercase())
}

//! Active-locale detection and locale-change notifications.
//!
//! - `detector`: reads the locale the host is currently displaying
//! - `bridge`: turns host notifications into calls on a registered callback
//!
//! Notifications carry no payload. Whoever handles one re-reads the locale
//! through a [`LocaleDetector`] at that moment.

mod bridge;
mod detector;

pub use bridge::{LocaleChanged, LocaleEventBridge, LocaleNotifier, SubscriptionId};
pub use detector::{primary_language, FixedLocaleDetector, LocaleDetector, SystemLocaleDetector};

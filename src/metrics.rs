//! Translation metrics and observability module.
//!
//! Counters are owned by each `TranslationService`, so independent services
//! (and tests) never share numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-service translation counters.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of support-list requests issued
    support_checks: AtomicUsize,

    /// Number of support-list requests that failed and resolved to "not supported"
    support_check_failures: AtomicUsize,

    /// Number of translate requests sent to the provider
    api_calls: AtomicUsize,

    /// Number of translate requests that failed
    api_failures: AtomicUsize,

    /// Number of translate calls rejected locally because the locale is unsupported
    gated_calls: AtomicUsize,
}

impl TranslationMetrics {
    /// Create counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a support-list request.
    pub fn record_support_check(&self) {
        self.support_checks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a support-list request that failed.
    pub fn record_support_check_failure(&self) {
        self.support_check_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a translate request sent to the provider.
    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a translate request that failed.
    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a translate call rejected because the locale is unsupported.
    pub fn record_gated_call(&self) {
        self.gated_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current support-check count.
    pub fn support_checks(&self) -> usize {
        self.support_checks.load(Ordering::Relaxed)
    }

    /// Get the current support-check failure count.
    pub fn support_check_failures(&self) -> usize {
        self.support_check_failures.load(Ordering::Relaxed)
    }

    /// Get the current API call count.
    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    /// Get the current API failure count.
    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    /// Get the current gated call count.
    pub fn gated_calls(&self) -> usize {
        self.gated_calls.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let calls = self.api_calls();
        let failures = self.api_failures();
        let api_success_rate = if calls > 0 {
            (calls.saturating_sub(failures) as f64 / calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            support_checks: self.support_checks(),
            support_check_failures: self.support_check_failures(),
            api_calls: calls,
            api_failures: failures,
            api_success_rate,
            gated_calls: self.gated_calls(),
        }
    }
}

/// Snapshot of the counters at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub support_checks: usize,
    pub support_check_failures: usize,
    pub api_calls: usize,
    pub api_failures: usize,
    /// Percentage (0-100) of translate requests that succeeded
    pub api_success_rate: f64,
    pub gated_calls: usize,
}

impl MetricsReport {
    /// Format report as a human-readable log line.
    pub fn format_log(&self) -> String {
        format!(
            "Translation metrics: {} support checks ({} failed), {} API calls ({:.1}% success), {} gated",
            self.support_checks,
            self.support_check_failures,
            self.api_calls,
            self.api_success_rate,
            self.gated_calls
        )
    }
}

use anyhow::{bail, Context, Result};
use std::time::Duration;

const DEFAULT_API_VERSION: &str = "3.0";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection parameters for the translation provider.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider, without a trailing slash
    pub endpoint: String,
    /// Subscription key sent as `Ocp-Apim-Subscription-Key`
    pub api_key: String,
    /// Value of the `api-version` query parameter
    pub api_version: String,
    /// Subscription region sent as `Ocp-Apim-Subscription-Region` when present
    pub api_region: Option<String>,
    /// Applied to every provider request
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Create a config with no region and the default request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            api_key: api_key.into(),
            api_version: api_version.into(),
            api_region: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the subscription region. A blank region means none.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.api_region = if region.trim().is_empty() {
            None
        } else {
            Some(region)
        };
        self
    }

    /// Set the timeout applied to every provider request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load the config from `TRANSLATION_*` environment variables and validate it.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            endpoint: normalize_endpoint(
                std::env::var("TRANSLATION_API_ENDPOINT")
                    .context("TRANSLATION_API_ENDPOINT not set")?,
            ),
            api_key: std::env::var("TRANSLATION_API_KEY")
                .context("TRANSLATION_API_KEY not set")?,
            api_version: std::env::var("TRANSLATION_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            api_region: std::env::var("TRANSLATION_API_REGION")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout: Duration::from_secs(
                std::env::var("TRANSLATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot make a real provider call.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            bail!("Translation endpoint must not be empty");
        }
        if self.api_key.trim().is_empty() {
            bail!("Translation API key must not be empty");
        }
        Ok(())
    }

    /// Build an HTTP client that enforces `request_timeout` on both provider calls.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client for translation provider")
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "TRANSLATION_API_ENDPOINT",
        "TRANSLATION_API_KEY",
        "TRANSLATION_API_VERSION",
        "TRANSLATION_API_REGION",
        "TRANSLATION_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_with_defaults() {
        clear_env();
        std::env::set_var("TRANSLATION_API_ENDPOINT", "https://api.example.com/");
        std::env::set_var("TRANSLATION_API_KEY", "secret");

        let config = ProviderConfig::from_env().expect("Should load config");

        assert_eq!(config.endpoint, "https://api.example.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_version, "3.0");
        assert!(config.api_region.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_optional_values() {
        clear_env();
        std::env::set_var("TRANSLATION_API_ENDPOINT", "https://api.example.com");
        std::env::set_var("TRANSLATION_API_KEY", "secret");
        std::env::set_var("TRANSLATION_API_VERSION", "2.0");
        std::env::set_var("TRANSLATION_API_REGION", "westeurope");
        std::env::set_var("TRANSLATION_TIMEOUT_SECS", "3");

        let config = ProviderConfig::from_env().expect("Should load config");

        assert_eq!(config.api_version, "2.0");
        assert_eq!(config.api_region.as_deref(), Some("westeurope"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_key() {
        clear_env();
        std::env::set_var("TRANSLATION_API_ENDPOINT", "https://api.example.com");

        let err = ProviderConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TRANSLATION_API_KEY"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_blank_region_is_absent() {
        clear_env();
        std::env::set_var("TRANSLATION_API_ENDPOINT", "https://api.example.com");
        std::env::set_var("TRANSLATION_API_KEY", "secret");
        std::env::set_var("TRANSLATION_API_REGION", "  ");

        let config = ProviderConfig::from_env().expect("Should load config");
        assert!(config.api_region.is_none());
        clear_env();
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let config = ProviderConfig::new("https://api.example.com", "", "3.0");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let config = ProviderConfig::new("  ", "secret", "3.0");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = ProviderConfig::new("https://api.example.com//", "secret", "3.0")
            .with_region("eastus")
            .with_request_timeout(Duration::from_millis(250));

        assert_eq!(config.endpoint, "https://api.example.com");
        assert_eq!(config.api_region.as_deref(), Some("eastus"));
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert!(config.build_http_client().is_ok());
    }
}

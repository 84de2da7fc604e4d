use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.emarsys.net";
pub const DEFAULT_ENVIRONMENT_URL_TEMPLATE: &str = "https://{environment}";
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    // Suite API
    pub api_url: String,
    pub api_user: String,
    pub api_secret: String,
    pub request_timeout: Duration,

    // Translations
    /// Base URL of an environment; `{environment}` is replaced with the
    /// environment host taken from the validated data.
    pub environment_url_template: String,
    pub fallback_language: String,
}

impl SuiteConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: std::env::var("SUITE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_user: std::env::var("SUITE_API_USER").context("SUITE_API_USER not set")?,
            api_secret: std::env::var("SUITE_API_SECRET").context("SUITE_API_SECRET not set")?,
            request_timeout: Duration::from_secs(
                std::env::var("SUITE_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),

            environment_url_template: std::env::var("SUITE_ENVIRONMENT_URL_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_ENVIRONMENT_URL_TEMPLATE.to_string()),
            fallback_language: std::env::var("SUITE_FALLBACK_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FALLBACK_LANGUAGE.to_string()),
        })
    }

    /// Resolve the base URL for an environment host.
    pub fn environment_url(&self, environment: &str) -> String {
        environment_url(&self.environment_url_template, environment)
    }

    /// Build a shared HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

pub(crate) fn environment_url(template: &str, environment: &str) -> String {
    template
        .replace("{environment}", environment)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "SUITE_API_URL",
            "SUITE_API_USER",
            "SUITE_API_SECRET",
            "SUITE_REQUEST_TIMEOUT_SECS",
            "SUITE_ENVIRONMENT_URL_TEMPLATE",
            "SUITE_FALLBACK_LANGUAGE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_credentials() {
        clear_env();

        let result = SuiteConfig::from_env();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SUITE_API_USER"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("SUITE_API_USER", "user");
        std::env::set_var("SUITE_API_SECRET", "secret");

        let config = SuiteConfig::from_env().expect("config should load");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.environment_url_template, DEFAULT_ENVIRONMENT_URL_TEMPLATE);
        assert_eq!(config.fallback_language, "en");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("SUITE_API_USER", "user");
        std::env::set_var("SUITE_API_SECRET", "secret");
        std::env::set_var("SUITE_FALLBACK_LANGUAGE", "de");
        std::env::set_var("SUITE_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("SUITE_ENVIRONMENT_URL_TEMPLATE", "http://{environment}:8080");

        let config = SuiteConfig::from_env().expect("config should load");

        assert_eq!(config.fallback_language, "de");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.environment_url("suite.local"), "http://suite.local:8080");
        clear_env();
    }

    #[test]
    fn test_environment_url_without_placeholder_is_used_verbatim() {
        assert_eq!(
            environment_url("http://127.0.0.1:9000/", "ignored"),
            "http://127.0.0.1:9000"
        );
        assert_eq!(
            environment_url(DEFAULT_ENVIRONMENT_URL_TEMPLATE, "login.suite.test"),
            "https://login.suite.test"
        );
    }
}

use super::{TranslationCacheKey, TranslationDictionary};
use crate::config::{environment_url, SuiteConfig};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

/// Loads one dictionary from the remote translation service.
///
/// Implementations never fail: anything short of a usable dictionary is an
/// empty one.
#[async_trait]
pub trait TranslationFetcher: Send + Sync {
    async fn fetch(&self, key: &TranslationCacheKey) -> TranslationDictionary;
}

/// Fetches `<environment>/js/translate/translate_<id>.js.php?lang=<language>`.
#[derive(Debug, Clone)]
pub struct HttpTranslationFetcher {
    client: reqwest::Client,
    environment_url_template: String,
}

impl HttpTranslationFetcher {
    pub fn new(client: reqwest::Client, environment_url_template: impl Into<String>) -> Self {
        Self {
            client,
            environment_url_template: environment_url_template.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &SuiteConfig) -> Self {
        Self::new(client, config.environment_url_template.clone())
    }

    pub fn url(&self, key: &TranslationCacheKey) -> String {
        format!(
            "{}/js/translate/translate_{}.js.php",
            environment_url(&self.environment_url_template, &key.environment),
            key.translation_id
        )
    }

    async fn try_fetch(&self, key: &TranslationCacheKey) -> Result<TranslationDictionary> {
        let response = self
            .client
            .get(self.url(key))
            .query(&[("lang", key.language.as_str())])
            .send()
            .await
            .context("Translation request failed")?;

        if response.status() != StatusCode::OK {
            bail!("Translation service returned {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Translation response is not valid JSON")?;

        match body {
            Value::Object(dictionary) => Ok(dictionary),
            other => bail!("Expected a JSON object, got {}", other),
        }
    }
}

#[async_trait]
impl TranslationFetcher for HttpTranslationFetcher {
    async fn fetch(&self, key: &TranslationCacheKey) -> TranslationDictionary {
        match self.try_fetch(key).await {
            Ok(dictionary) => {
                debug!("Fetched {} translations for {}", dictionary.len(), key);
                dictionary
            }
            Err(e) => {
                warn!("Translations for {} unavailable ({:#}), using empty dictionary", key, e);
                TranslationDictionary::new()
            }
        }
    }
}

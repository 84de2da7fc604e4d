//! Preview translations binary - fetches one translation dictionary and prints it
//!
//! Usage:
//!   cargo run --bin preview-translations -- <environment> <translation-id> [language]
//!   cargo run --bin preview-translations -- suite.test dashboard de --key menu.title
//!
//! Optional environment variables:
//! - SUITE_ENVIRONMENT_URL_TEMPLATE (defaults to https://{environment})
//! - SUITE_FALLBACK_LANGUAGE (defaults to en)
//! - SUITE_REQUEST_TIMEOUT_SECS (defaults to 30)

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use suite_sdk::config::{DEFAULT_ENVIRONMENT_URL_TEMPLATE, DEFAULT_FALLBACK_LANGUAGE};
use suite_sdk::translations::{
    HttpTranslationFetcher, TranslationCacheKey, TranslationFetcher, Translator,
};
use tracing::info;

/// Minimal config for preview (no API credentials required)
struct PreviewConfig {
    environment_url_template: String,
    fallback_language: String,
    request_timeout: Duration,
}

impl PreviewConfig {
    fn from_env() -> Self {
        Self {
            environment_url_template: std::env::var("SUITE_ENVIRONMENT_URL_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_ENVIRONMENT_URL_TEMPLATE.to_string()),
            fallback_language: std::env::var("SUITE_FALLBACK_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_LANGUAGE.to_string()),
            request_timeout: Duration::from_secs(
                std::env::var("SUITE_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

struct Args {
    environment: String,
    translation_id: String,
    language: Option<String>,
    key: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut key = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--key" {
            key = Some(iter.next().context("--key needs a value")?.clone());
        } else {
            positional.push(arg.clone());
        }
    }

    let mut positional = positional.into_iter();
    let (Some(environment), Some(translation_id)) = (positional.next(), positional.next()) else {
        bail!("Usage: preview-translations <environment> <translation-id> [language] [--key <key>]");
    };

    Ok(Args {
        environment,
        translation_id,
        language: positional.next(),
        key,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("suite_sdk=info".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = PreviewConfig::from_env();

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let fetcher = HttpTranslationFetcher::new(client, config.environment_url_template);

    let language = args.language.unwrap_or(config.fallback_language);
    let key = TranslationCacheKey::new(args.environment, language, args.translation_id);

    info!("Fetching translations from {}", fetcher.url(&key));
    let dictionary = fetcher.fetch(&key).await;
    info!("Received {} entries for {}", dictionary.len(), key);

    let translator = Translator::create(Arc::new(dictionary));

    println!("\n{}", "=".repeat(60));
    match args.key {
        Some(message_key) => {
            println!("{} = {}", message_key, translator.translate(&message_key, &[]));
        }
        None => {
            println!(
                "{}",
                serde_json::to_string_pretty(translator.dictionary().as_ref())?
            );
        }
    }
    println!("{}\n", "=".repeat(60));

    Ok(())
}

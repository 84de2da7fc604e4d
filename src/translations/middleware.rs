use super::context::RequestContext;
use super::render_decorator::{DecoratorFactory, RenderDecoratorFactory};
use super::{
    HttpTranslationFetcher, TranslationCache, TranslationCacheKey, TranslationDictionary,
    TranslationError, TranslationFetcher, Translator,
};
use crate::api::{AdministratorQuery, ApiFactory, RequestOptions};
use crate::config::{SuiteConfig, DEFAULT_FALLBACK_LANGUAGE};
use crate::validated_data::ValidatedData;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves per-admin translations and attaches them to a request's render
/// pipeline.
///
/// Language precedence: `language` from the validated data, then the
/// administrator's `interface_language`, then the fallback language. The
/// dictionary for `(environment, language, translation id)` is fetched once
/// per cache lifetime.
#[derive(Clone)]
pub struct TranslationMiddleware {
    api: Arc<dyn ApiFactory>,
    fetcher: Arc<dyn TranslationFetcher>,
    cache: TranslationCache,
    decorators: Arc<dyn DecoratorFactory>,
    fallback_language: String,
}

impl TranslationMiddleware {
    pub fn new(
        api: Arc<dyn ApiFactory>,
        fetcher: Arc<dyn TranslationFetcher>,
        cache: TranslationCache,
    ) -> Self {
        Self {
            api,
            fetcher,
            cache,
            decorators: Arc::new(RenderDecoratorFactory),
            fallback_language: DEFAULT_FALLBACK_LANGUAGE.to_string(),
        }
    }

    pub fn from_config(
        config: &SuiteConfig,
        client: reqwest::Client,
        api: Arc<dyn ApiFactory>,
    ) -> Self {
        let fetcher = HttpTranslationFetcher::from_config(client, config);
        Self::new(api, Arc::new(fetcher), TranslationCache::new())
            .with_fallback_language(config.fallback_language.clone())
    }

    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = language.into();
        self
    }

    pub fn with_decorator_factory(mut self, decorators: Arc<dyn DecoratorFactory>) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Build the wrapper for one route. `api_options` override the defaults
    /// derived from the validated data for the administrator lookup.
    pub fn decorate_render_with_translations(
        &self,
        translation_id: Option<&str>,
        api_options: Option<RequestOptions>,
    ) -> DecorateRender {
        DecorateRender {
            middleware: self.clone(),
            translation_id: translation_id.map(str::to_string),
            api_options,
        }
    }

    /// Validate the inputs and produce a translator for them.
    ///
    /// Errors are returned before any remote call is made.
    pub async fn resolve(
        &self,
        scope: &str,
        validated: Option<&ValidatedData>,
        translation_id: Option<&str>,
        api_options: Option<&RequestOptions>,
    ) -> Result<Translator, TranslationError> {
        let validated = validated.ok_or(TranslationError::MissingValidatedData)?;
        if validated.environment().is_none() && validated.language().is_none() {
            return Err(TranslationError::MissingEnvironment);
        }
        let translation_id = translation_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(TranslationError::MissingTranslationId)?;

        let language = self.resolve_language(scope, validated, api_options).await;
        let dictionary = match validated.environment() {
            Some(environment) => {
                let key = TranslationCacheKey::new(environment, language, translation_id);
                self.cache
                    .get_or_fetch(&key, || self.fetcher.fetch(&key))
                    .await
            }
            None => {
                warn!(
                    "No environment for translations '{}' ({}), using empty dictionary",
                    translation_id, language
                );
                Arc::new(TranslationDictionary::new())
            }
        };

        Ok(Translator::create(dictionary))
    }

    async fn resolve_language(
        &self,
        scope: &str,
        validated: &ValidatedData,
        api_options: Option<&RequestOptions>,
    ) -> String {
        if let Some(language) = validated.language() {
            return language.to_string();
        }

        let Some(admin_id) = validated.admin_id() else {
            debug!("No admin id in validated data, using fallback language");
            return self.fallback_language.clone();
        };

        let defaults = RequestOptions {
            customer_id: validated.customer_id().map(str::to_string),
            ..RequestOptions::default()
        };
        let options = api_options
            .cloned()
            .unwrap_or_default()
            .merged_over(defaults);

        let api = self.api.create_with_cache(scope);
        match api
            .get_administrator(&AdministratorQuery::new(admin_id), &options)
            .await
        {
            Ok(admin) => match admin.language() {
                Some(language) => language.to_string(),
                None => {
                    debug!("Administrator {} has no interface language", admin_id);
                    self.fallback_language.clone()
                }
            },
            Err(e) => {
                warn!(
                    "Administrator lookup for {} failed ({}), using fallback language",
                    admin_id, e
                );
                self.fallback_language.clone()
            }
        }
    }
}

/// The wrapper produced by
/// [`TranslationMiddleware::decorate_render_with_translations`].
#[derive(Clone)]
pub struct DecorateRender {
    middleware: TranslationMiddleware,
    translation_id: Option<String>,
    api_options: Option<RequestOptions>,
}

impl DecorateRender {
    pub fn translation_id(&self) -> Option<&str> {
        self.translation_id.as_deref()
    }

    /// Resolve this route's translator without touching a context.
    pub async fn resolve(
        &self,
        scope: &str,
        validated: Option<&ValidatedData>,
    ) -> Result<Translator, TranslationError> {
        self.middleware
            .resolve(
                scope,
                validated,
                self.translation_id.as_deref(),
                self.api_options.as_ref(),
            )
            .await
    }

    /// Drop API responses cached under `scope`.
    pub async fn release_scope(&self, scope: &str) {
        self.middleware.api.release_scope(scope).await;
    }

    /// Install translations on `context`, then run `next`. API responses
    /// cached for the context's id are released afterwards.
    ///
    /// `next` is not called when validation fails. Synchronous handlers can
    /// be passed as `|ctx| Box::pin(futures::future::ready(handle(ctx)))`.
    pub async fn call<T, N>(&self, context: &mut RequestContext, next: N) -> Result<T, TranslationError>
    where
        N: for<'c> FnOnce(&'c mut RequestContext) -> BoxFuture<'c, T>,
    {
        let translator = match self.resolve(context.id(), context.validated_data()).await {
            Ok(translator) => translator,
            Err(e) => {
                self.release_scope(context.id()).await;
                return Err(e);
            }
        };

        let translation_id = self.translation_id.as_deref().unwrap_or_default();
        self.middleware
            .decorators
            .install(context, translation_id, translator);

        let output = next(context).await;
        self.release_scope(context.id()).await;
        Ok(output)
    }
}

//! Per-admin translations for rendered views.
//!
//! # Architecture
//!
//! - `middleware`: language resolution, cache-or-fetch and decorator install
//! - `cache`: owned `(environment, language, translation id)` dictionary cache
//! - `fetcher`: remote dictionary download
//! - `translator`: lookups and placeholder substitution over one dictionary
//! - `render_decorator`: merges translations into every render call
//! - `context`: framework-neutral request context and render data
//! - `layer`: axum adapter
//!
//! # Example
//!
//! ```rust,ignore
//! let middleware = TranslationMiddleware::from_config(&config, client, api_factory);
//! let decorate = middleware.decorate_render_with_translations(Some("dashboard"), None);
//!
//! decorate
//!     .call(&mut context, |ctx| {
//!         async move { ctx.render("dashboard", RenderData::new()) }.boxed()
//!     })
//!     .await?;
//! ```

mod cache;
mod context;
mod error;
mod fetcher;
mod layer;
mod middleware;
mod render_decorator;
mod translator;

/// Message key to message template, as served by the translation service.
pub type TranslationDictionary = serde_json::Map<String, serde_json::Value>;

/// Render data key holding the full dictionary.
pub const TRANSLATIONS_FIELD: &str = "translations";

/// Render data helper name for the translate function.
pub const TRANSLATE_HELPER: &str = "_";

pub use cache::{TranslationCache, TranslationCacheKey};
pub use context::{RenderData, Renderer, RequestContext};
pub use error::TranslationError;
pub use fetcher::{HttpTranslationFetcher, TranslationFetcher};
pub use layer::{translations_layer, Translations, REQUEST_ID_HEADER};
pub use middleware::{DecorateRender, TranslationMiddleware};
pub use render_decorator::{
    augment_render_data, DecoratorFactory, RenderDecorator, RenderDecoratorFactory,
};
pub use translator::{TranslateFn, Translator};

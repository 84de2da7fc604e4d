//! axum adapter for the translation middleware.
//!
//! Reads the [`ValidatedData`] left in the request extensions by the
//! signed-URL layer, resolves translations and inserts a [`Translations`]
//! extension for handlers:
//!
//! ```rust,ignore
//! let decorate = middleware.decorate_render_with_translations(Some("campaigns"), None);
//! let app = Router::new()
//!     .route("/campaigns", get(campaigns))
//!     .layer(from_fn_with_state(decorate, translations_layer))
//!     .layer(from_fn_with_state(authenticator, signed_url_layer));
//! ```

use super::middleware::DecorateRender;
use super::render_decorator::augment_render_data;
use super::{RenderData, TranslationDictionary, TranslationError, Translator};
use crate::validated_data::ValidatedData;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Translations resolved for the current request.
#[derive(Debug, Clone)]
pub struct Translations {
    translator: Translator,
}

impl Translations {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn dictionary(&self) -> &Arc<TranslationDictionary> {
        self.translator.dictionary()
    }

    pub fn translate(&self, key: &str, params: &[&str]) -> String {
        self.translator.translate(key, params)
    }

    /// Merge `translations` and the `_` helper into `data`.
    pub fn decorate(&self, mut data: RenderData) -> RenderData {
        augment_render_data(&mut data, &self.translator);
        data
    }
}

/// `from_fn_with_state` middleware; the state is the route's
/// [`DecorateRender`]. API responses cached for the request scope are
/// released once the response is built.
pub async fn translations_layer(
    State(decorate): State<DecorateRender>,
    mut request: Request,
    next: Next,
) -> Result<Response, TranslationError> {
    let scope = request_scope(request.headers());
    let validated = request.extensions().get::<ValidatedData>().cloned();

    let response = match decorate.resolve(&scope, validated.as_ref()).await {
        Ok(translator) => {
            request.extensions_mut().insert(Translations::new(translator));
            Ok(next.run(request).await)
        }
        Err(e) => Err(e),
    };

    decorate.release_scope(&scope).await;
    response
}

/// The caller's request id, or a process-unique one.
fn request_scope(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("req-{}", NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_scope_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc"));

        assert_eq!(request_scope(&headers), "abc");
    }

    #[test]
    fn test_generated_scopes_are_unique() {
        let headers = HeaderMap::new();

        assert_ne!(request_scope(&headers), request_scope(&headers));
    }
}

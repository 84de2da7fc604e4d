use super::context::{RenderData, Renderer, RequestContext};
use super::{Translator, TRANSLATE_HELPER, TRANSLATIONS_FIELD};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Add the dictionary under `translations` and the translate helper under
/// `_`, replacing any field of either name. Every other entry of `data` is
/// left alone.
pub fn augment_render_data(data: &mut RenderData, translator: &Translator) {
    data.insert(
        TRANSLATIONS_FIELD,
        Value::Object(translator.dictionary().as_ref().clone()),
    );
    data.remove(TRANSLATE_HELPER);
    data.insert_helper(TRANSLATE_HELPER, translator.translate_fn());
}

/// Replaces a context's renderer with one that merges translations into
/// every render call.
pub struct RenderDecorator<'c> {
    context: &'c mut RequestContext,
    translation_id: String,
}

impl<'c> RenderDecorator<'c> {
    pub fn create(context: &'c mut RequestContext, translation_id: &str) -> Self {
        Self {
            context,
            translation_id: translation_id.to_string(),
        }
    }

    pub fn decorate(self, translator: Translator) {
        let inner = self.context.renderer();
        self.context.set_renderer(Arc::new(TranslatingRenderer {
            inner,
            translator,
            translation_id: self.translation_id,
        }));
    }
}

struct TranslatingRenderer {
    inner: Arc<dyn Renderer>,
    translator: Translator,
    translation_id: String,
}

impl Renderer for TranslatingRenderer {
    fn render(&self, view: &str, mut data: RenderData) {
        debug!("Rendering {} with translations '{}'", view, self.translation_id);
        augment_render_data(&mut data, &self.translator);
        self.inner.render(view, data);
    }
}

/// Seam for swapping out how the middleware installs the decorator.
pub trait DecoratorFactory: Send + Sync {
    fn install(&self, context: &mut RequestContext, translation_id: &str, translator: Translator);
}

/// Installs a [`RenderDecorator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderDecoratorFactory;

impl DecoratorFactory for RenderDecoratorFactory {
    fn install(&self, context: &mut RequestContext, translation_id: &str, translator: Translator) {
        RenderDecorator::create(context, translation_id).decorate(translator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::context::testing::RecordingRenderer;
    use serde_json::json;

    fn translator() -> Translator {
        let dictionary = json!({"messages": "from mock", "hello": "Hello %s"});
        Translator::create(Arc::new(dictionary.as_object().unwrap().clone()))
    }

    #[test]
    fn test_decorated_render_keeps_original_data() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut context = RequestContext::new("5", renderer.clone());

        RenderDecorator::create(&mut context, "test").decorate(translator());
        context.render("local.view.render", RenderData::from_value(json!({"someData": 1})));

        let data = renderer.last_render_data().unwrap();
        assert_eq!(data.get("someData"), Some(&json!(1)));
        assert_eq!(
            data.get("translations"),
            Some(&json!({"messages": "from mock", "hello": "Hello %s"}))
        );
        assert_eq!(data.helper("_").unwrap()("hello", &["Ann"]), "Hello Ann");
        assert_eq!(renderer.last_view().as_deref(), Some("local.view.render"));
    }

    #[test]
    fn test_decoration_overwrites_only_reserved_keys() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut context = RequestContext::new("5", renderer.clone());

        RenderDecoratorFactory.install(&mut context, "test", translator());
        context.render(
            "view",
            RenderData::from_value(json!({"translations": "stale", "_": "stale", "title": "kept"})),
        );

        let data = renderer.last_render_data().unwrap();
        assert_eq!(data.get("title"), Some(&json!("kept")));
        assert_eq!(data.get("translations").unwrap()["messages"], "from mock");
        assert_eq!(data.get("_"), None);
        assert!(data.helper("_").is_some());
        assert!(!data.into_fields().contains_key("_"));
    }

    #[test]
    fn test_decorator_applies_to_every_render() {
        let renderer = Arc::new(RecordingRenderer::default());
        let mut context = RequestContext::new("5", renderer.clone());
        RenderDecorator::create(&mut context, "test").decorate(translator());

        context.render("first", RenderData::new());
        context.render("second", RenderData::from_value(json!({"anotherData": 2})));

        let data = renderer.last_render_data().unwrap();
        assert_eq!(data.get("anotherData"), Some(&json!(2)));
        assert!(data.contains_key("translations"));
        assert!(data.contains_key("_"));
    }
}

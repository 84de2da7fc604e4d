//! Framework-neutral request context used by the translation middleware.

use super::TranslateFn;
use crate::validated_data::ValidatedData;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Data handed to a view: JSON fields plus named helper functions.
#[derive(Clone, Default)]
pub struct RenderData {
    fields: Map<String, Value>,
    helpers: BTreeMap<String, TranslateFn>,
}

impl RenderData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-object values produce empty render data.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::from(fields),
            _ => Self::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn insert_helper(&mut self, name: impl Into<String>, helper: TranslateFn) {
        self.helpers.insert(name.into(), helper);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn helper(&self, name: &str) -> Option<&TranslateFn> {
        self.helpers.get(name)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.helpers.contains_key(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// JSON fields only; helpers cannot be serialized.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for RenderData {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            helpers: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for RenderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderData")
            .field("fields", &self.fields)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The output side of a request.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, data: RenderData);
}

/// One inbound request as seen by the translation middleware.
pub struct RequestContext {
    id: String,
    validated_data: Option<ValidatedData>,
    renderer: Arc<dyn Renderer>,
}

impl RequestContext {
    /// `id` scopes cached API responses to this request.
    pub fn new(id: impl Into<String>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            id: id.into(),
            validated_data: None,
            renderer,
        }
    }

    pub fn with_validated_data(mut self, data: ValidatedData) -> Self {
        self.validated_data = Some(data);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn validated_data(&self) -> Option<&ValidatedData> {
        self.validated_data.as_ref()
    }

    pub fn set_validated_data(&mut self, data: Option<ValidatedData>) {
        self.validated_data = data;
    }

    pub fn render(&self, view: &str, data: RenderData) {
        self.renderer.render(view, data);
    }

    pub fn renderer(&self) -> Arc<dyn Renderer> {
        self.renderer.clone()
    }

    pub fn set_renderer(&mut self, renderer: Arc<dyn Renderer>) {
        self.renderer = renderer;
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("id", &self.id)
            .field("validated_data", &self.validated_data)
            .finish_non_exhaustive()
    }
}

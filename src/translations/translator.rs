use super::TranslationDictionary;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Translate helper handed to templates: `(key, params) -> text`.
pub type TranslateFn = Arc<dyn Fn(&str, &[&str]) -> String + Send + Sync>;

/// Lookups against one fixed dictionary.
///
/// `translate` resolves `key` directly, then as a dotted path into nested
/// objects. String templates take `%s`/`%d` placeholders filled from
/// `params` in order, and `%%` renders a literal `%`. Placeholders without a
/// matching param are left as written. Unknown keys translate to the key
/// itself; non-string values render as JSON.
#[derive(Clone)]
pub struct Translator {
    dictionary: Arc<TranslationDictionary>,
}

impl Translator {
    pub fn create(dictionary: Arc<TranslationDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &Arc<TranslationDictionary> {
        &self.dictionary
    }

    pub fn translate(&self, key: &str, params: &[&str]) -> String {
        match lookup(&self.dictionary, key) {
            Some(Value::String(template)) => format_template(template, params),
            Some(other) => other.to_string(),
            None => key.to_string(),
        }
    }

    pub fn translate_fn(&self) -> TranslateFn {
        let translator = self.clone();
        Arc::new(move |key: &str, params: &[&str]| translator.translate(key, params))
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("keys", &self.dictionary.len())
            .finish()
    }
}

fn lookup<'a>(dictionary: &'a TranslationDictionary, key: &str) -> Option<&'a Value> {
    if let Some(value) = dictionary.get(key) {
        return Some(value);
    }

    let mut parts = key.split('.');
    let mut current = dictionary.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn format_template(template: &str, params: &[&str]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut params = params.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            output.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                output.push('%');
            }
            Some(&conversion) if conversion == 's' || conversion == 'd' => {
                chars.next();
                match params.next() {
                    Some(param) => output.push_str(param),
                    None => {
                        output.push('%');
                        output.push(conversion);
                    }
                }
            }
            _ => output.push('%'),
        }
    }

    output
}

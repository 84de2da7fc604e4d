//! Request parameters that passed upstream validation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters of an authenticated request. The named fields drive
/// translation lookups; everything else is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatedData {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ValidatedData {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            other => serde_json::from_value(other),
        }
    }

    /// Build from decoded key/value pairs such as a query string.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, serde_json::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect::<serde_json::Map<_, _>>();
        Self::from_value(Value::Object(map))
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_admin(mut self, customer_id: impl Into<String>, admin_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self.admin_id = Some(admin_id.into());
        self
    }

    pub fn environment(&self) -> Option<&str> {
        non_blank(&self.environment)
    }

    pub fn language(&self) -> Option<&str> {
        non_blank(&self.language)
    }

    pub fn admin_id(&self) -> Option<&str> {
        non_blank(&self.admin_id)
    }

    pub fn customer_id(&self) -> Option<&str> {
        non_blank(&self.customer_id)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Ids arrive as strings from query strings and as numbers from JSON bodies.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a string or number, got {}",
                other
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_accepts_numeric_ids() {
        let data = ValidatedData::from_value(json!({
            "environment": "suite.test",
            "customer_id": 12,
            "admin_id": "21",
            "campaign": 3
        }))
        .unwrap();

        assert_eq!(data.environment(), Some("suite.test"));
        assert_eq!(data.customer_id(), Some("12"));
        assert_eq!(data.admin_id(), Some("21"));
        assert_eq!(data.language(), None);
        assert_eq!(data.extra.get("campaign"), Some(&json!(3)));
    }

    #[test]
    fn test_from_pairs_keeps_unknown_parameters() {
        let data =
            ValidatedData::from_pairs([("queryPar1", "1"), ("language", "mx")]).unwrap();

        assert_eq!(data.language(), Some("mx"));
        assert_eq!(data.extra.get("queryPar1"), Some(&json!("1")));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let data = ValidatedData::default().with_environment(" ").with_language("");

        assert_eq!(data.environment(), None);
        assert_eq!(data.language(), None);
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(ValidatedData::from_value(Value::Null).unwrap(), ValidatedData::default());
    }

    #[test]
    fn test_rejects_structured_ids() {
        assert!(ValidatedData::from_value(json!({"admin_id": {"id": 1}})).is_err());
    }
}

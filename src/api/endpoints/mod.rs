//! Endpoint wrappers: validate the payload, build the path, delegate to
//! [`SuiteRequest`](crate::api::SuiteRequest).

mod administrator;
mod automation_center;
mod contact;
mod keyring;

pub use administrator::{Administrator, AdministratorApi, AdministratorQuery, Administrators};
pub use automation_center::AutomationCenter;
pub use contact::Contact;
pub use keyring::Keyring;

use crate::api::{ApiError, RequestOptions};
use serde_json::Value;

/// State shared by every endpoint: the customer used when the call options
/// do not name one.
#[derive(Debug, Clone, Default)]
pub(crate) struct EndpointBase {
    customer_id: Option<String>,
}

impl EndpointBase {
    pub(crate) fn new(customer_id: Option<String>) -> Self {
        Self { customer_id }
    }

    pub(crate) fn customer_id(&self, options: &RequestOptions) -> Result<String, ApiError> {
        options
            .customer_id
            .clone()
            .or_else(|| self.customer_id.clone())
            .ok_or(ApiError::MissingCustomerId)
    }
}

/// Fail with every name in `names` that is absent or null in `payload`.
pub(crate) fn require_parameters(payload: &Value, names: &[&str]) -> Result<(), ApiError> {
    let missing: Vec<String> = names
        .iter()
        .filter(|name| payload.get(**name).map_or(true, Value::is_null))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingParameters(missing))
    }
}

/// Render a payload field for use in a path segment. Strings are used
/// without quotes.
pub(crate) fn path_param(payload: &Value, name: &str) -> String {
    match payload.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Append the payload's fields to `path` as a query string.
pub(crate) fn build_url(path: &str, payload: &Value) -> String {
    let Some(fields) = payload.as_object().filter(|f| !f.is_empty()) else {
        return path.to_string();
    };

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        if value.is_null() {
            continue;
        }
        query.append_pair(name, &path_param(payload, name));
    }
    let query = query.finish();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

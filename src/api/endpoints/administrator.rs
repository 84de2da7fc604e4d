use super::EndpointBase;
use crate::api::{ApiError, RequestOptions, SuiteRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdministratorQuery {
    pub administrator_id: String,
}

impl AdministratorQuery {
    pub fn new(administrator_id: impl Into<String>) -> Self {
        Self {
            administrator_id: administrator_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Administrator {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub interface_language: Option<String>,
    #[serde(default)]
    pub superadmin: Value,
}

impl Administrator {
    /// The API reports the flag as `1`/`0`, `"1"`/`"0"` or a boolean.
    pub fn is_superadmin(&self) -> bool {
        match &self.superadmin {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// The configured interface language, if non-empty.
    pub fn language(&self) -> Option<&str> {
        self.interface_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Administrator lookups as consumed by the middleware and the superadmin
/// checker.
#[async_trait]
pub trait AdministratorApi: Send + Sync {
    async fn get_administrator(
        &self,
        query: &AdministratorQuery,
        options: &RequestOptions,
    ) -> Result<Administrator, ApiError>;
}

pub struct Administrators {
    request: Arc<dyn SuiteRequest>,
    base: EndpointBase,
}

impl Administrators {
    pub fn create(request: Arc<dyn SuiteRequest>, customer_id: Option<String>) -> Self {
        Self {
            request,
            base: EndpointBase::new(customer_id),
        }
    }

    pub async fn list(&self, options: &RequestOptions) -> Result<Vec<Administrator>, ApiError> {
        debug!("administrator_list");

        self.request
            .get(&self.base.customer_id(options)?, "/administrator", options)
            .await?
            .data()
    }
}

#[async_trait]
impl AdministratorApi for Administrators {
    async fn get_administrator(
        &self,
        query: &AdministratorQuery,
        options: &RequestOptions,
    ) -> Result<Administrator, ApiError> {
        if query.administrator_id.trim().is_empty() {
            return Err(ApiError::MissingParameters(vec![
                "administrator_id".to_string()
            ]));
        }
        debug!("administrator_get");

        self.request
            .get(
                &self.base.customer_id(options)?,
                &format!("/administrator/{}", query.administrator_id),
                options,
            )
            .await?
            .data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::testing::RecordingRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_administrator_builds_path() {
        let request = Arc::new(RecordingRequest::answering(json!({
            "id": 21,
            "interface_language": "mx",
            "superadmin": 0
        })));
        let endpoint = Administrators::create(request.clone(), None);

        let admin = endpoint
            .get_administrator(&AdministratorQuery::new("21"), &RequestOptions::for_customer("12"))
            .await
            .expect("lookup should succeed");

        assert_eq!(admin.language(), Some("mx"));
        assert!(!admin.is_superadmin());
        let calls = request.calls();
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[0].customer_id, "12");
        assert_eq!(calls[0].path, "/administrator/21");
    }

    #[tokio::test]
    async fn test_get_administrator_requires_id() {
        let request = Arc::new(RecordingRequest::default());
        let endpoint = Administrators::create(request.clone(), Some("12".to_string()));

        let result = endpoint
            .get_administrator(&AdministratorQuery::new(""), &RequestOptions::default())
            .await;

        assert!(matches!(result, Err(ApiError::MissingParameters(_))));
        assert!(request.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_decodes_records() {
        let request = Arc::new(RecordingRequest::answering(json!([
            {"id": 1, "username": "a"},
            {"id": 2, "username": "b", "superadmin": "1"}
        ])));
        let endpoint = Administrators::create(request, Some("12".to_string()));

        let admins = endpoint.list(&RequestOptions::default()).await.unwrap();

        assert_eq!(admins.len(), 2);
        assert!(admins[1].is_superadmin());
    }

    #[test]
    fn test_blank_language_is_none() {
        let admin = Administrator {
            interface_language: Some("  ".to_string()),
            ..Administrator::default()
        };
        assert_eq!(admin.language(), None);
    }
}

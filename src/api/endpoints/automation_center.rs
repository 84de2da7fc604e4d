use super::{path_param, require_parameters, EndpointBase};
use crate::api::{ApiError, ApiResponse, RequestOptions, SuiteRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct AutomationCenter {
    request: Arc<dyn SuiteRequest>,
    base: EndpointBase,
}

impl AutomationCenter {
    pub fn create(request: Arc<dyn SuiteRequest>, customer_id: Option<String>) -> Self {
        Self {
            request,
            base: EndpointBase::new(customer_id),
        }
    }

    /// Requires `service_id`. A set `resource_id` narrows to a single
    /// resource; `0`, `""`, `false` and null do not.
    pub async fn program_resource(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        require_parameters(payload, &["service_id"])?;
        debug!("automationcenter_programresource");

        let service_id = path_param(payload, "service_id");
        let path = match payload.get("resource_id").filter(|r| is_set(r)) {
            Some(_) => format!(
                "/programresource/service_id={}&resource_id={}",
                service_id,
                path_param(payload, "resource_id")
            ),
            None => format!("/programresource/service_id={}", service_id),
        };

        self.request
            .get(&self.base.customer_id(options)?, &path, options)
            .await
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::testing::RecordingRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_program_resource_paths() {
        let request = Arc::new(RecordingRequest::default());
        let center = AutomationCenter::create(request.clone(), Some("12".to_string()));

        center
            .program_resource(&json!({"service_id": "ems"}), &RequestOptions::default())
            .await
            .unwrap();
        center
            .program_resource(
                &json!({"service_id": "ems", "resource_id": 4}),
                &RequestOptions::default(),
            )
            .await
            .unwrap();

        let calls = request.calls();
        assert_eq!(calls[0].path, "/programresource/service_id=ems");
        assert_eq!(calls[1].path, "/programresource/service_id=ems&resource_id=4");
    }

    #[tokio::test]
    async fn test_program_resource_ignores_unset_resource_id() {
        let request = Arc::new(RecordingRequest::default());
        let center = AutomationCenter::create(request.clone(), Some("12".to_string()));

        for resource_id in [json!(0), json!(""), json!(false), json!(null)] {
            center
                .program_resource(
                    &json!({"service_id": "ems", "resource_id": resource_id}),
                    &RequestOptions::default(),
                )
                .await
                .unwrap();
        }

        let calls = request.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|c| c.path == "/programresource/service_id=ems"));
    }

    #[tokio::test]
    async fn test_program_resource_requires_service_id() {
        let request = Arc::new(RecordingRequest::default());
        let center = AutomationCenter::create(request.clone(), Some("12".to_string()));

        let result = center
            .program_resource(&json!({"resource_id": 4}), &RequestOptions::default())
            .await;

        assert!(matches!(result, Err(ApiError::MissingParameters(_))));
        assert!(request.calls().is_empty());
    }
}

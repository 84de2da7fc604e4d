use super::{build_url, path_param, require_parameters, EndpointBase};
use crate::api::{ApiError, ApiResponse, RequestOptions, SuiteRequest};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub struct Keyring {
    request: Arc<dyn SuiteRequest>,
    base: EndpointBase,
}

impl Keyring {
    pub fn create(request: Arc<dyn SuiteRequest>, customer_id: Option<String>) -> Self {
        Self {
            request,
            base: EndpointBase::new(customer_id),
        }
    }

    /// Payload fields become query parameters.
    pub async fn list(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        debug!("keyring_keys");

        self.request
            .get(
                &self.base.customer_id(options)?,
                &build_url("/keyring/keys", payload),
                options,
            )
            .await
    }

    pub async fn get(&self, payload: &Value, options: &RequestOptions) -> Result<ApiResponse, ApiError> {
        require_parameters(payload, &["key_id"])?;
        debug!("keyring_get_key");

        self.request
            .get(
                &self.base.customer_id(options)?,
                &format!("/keyring/keys/{}", path_param(payload, "key_id")),
                options,
            )
            .await
    }

    /// Only `comment` is forwarded.
    pub async fn create_key(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        require_parameters(payload, &["comment"])?;
        debug!("keyring_create_key");

        self.request
            .post(
                &self.base.customer_id(options)?,
                "/keyring/keys",
                &json!({ "comment": payload["comment"] }),
                options,
            )
            .await
    }

    pub async fn delete(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        require_parameters(payload, &["key_id"])?;
        debug!("keyring_delete_key");

        self.request
            .post(
                &self.base.customer_id(options)?,
                &format!("/keyring/keys/{}/delete", path_param(payload, "key_id")),
                &json!({}),
                options,
            )
            .await
    }
}

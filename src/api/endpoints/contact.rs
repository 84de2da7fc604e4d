use super::{require_parameters, EndpointBase};
use crate::api::{ApiError, ApiResponse, RequestOptions, SuiteRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct Contact {
    request: Arc<dyn SuiteRequest>,
    base: EndpointBase,
}

impl Contact {
    pub fn create(request: Arc<dyn SuiteRequest>, customer_id: Option<String>) -> Self {
        Self {
            request,
            base: EndpointBase::new(customer_id),
        }
    }

    pub async fn create_contact(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        debug!("contact_create");

        self.request
            .post(&self.base.customer_id(options)?, "/contact", payload, options)
            .await
    }

    pub async fn update(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        debug!("contact_update");

        self.request
            .put(&self.base.customer_id(options)?, "/contact", payload, options)
            .await
    }

    pub async fn create_or_update(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        debug!("contact_update");

        self.request
            .put(
                &self.base.customer_id(options)?,
                "/contact/create_if_not_exists=1",
                payload,
                options,
            )
            .await
    }

    /// Requires `keyValues`.
    pub async fn get_data(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        require_parameters(payload, &["keyValues"])?;
        debug!("contact_getdata");

        let path = if options.string_ids {
            "/contact/getdata/stringids=1"
        } else {
            "/contact/getdata"
        };

        self.request
            .post(&self.base.customer_id(options)?, path, payload, options)
            .await
    }

    pub async fn merge(
        &self,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        debug!("contact_merge");

        self.request
            .post(&self.base.customer_id(options)?, "/contact/merge", payload, options)
            .await
    }
}

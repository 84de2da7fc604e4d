//! Generic request layer shared by every endpoint wrapper.
//!
//! Endpoints only ever talk to the [`SuiteRequest`] trait. [`HttpRequest`] is
//! the reqwest-backed transport and [`CachedRequest`] memoizes GET responses
//! for one scope (usually one inbound request).

use crate::api::ApiError;
use crate::config::SuiteConfig;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Per-call options accepted by every endpoint operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub customer_id: Option<String>,
    /// Overrides the configured API host for this call.
    pub host: Option<String>,
    /// Ask the contact endpoints for string field identifiers.
    pub string_ids: bool,
}

impl RequestOptions {
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_string_ids(mut self, string_ids: bool) -> Self {
        self.string_ids = string_ids;
        self
    }

    /// Fill unset fields from `defaults`; fields set on `self` win.
    pub fn merged_over(self, defaults: RequestOptions) -> Self {
        Self {
            customer_id: self.customer_id.or(defaults.customer_id),
            host: self.host.or(defaults.host),
            string_ids: self.string_ids || defaults.string_ids,
        }
    }
}

/// The Suite response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteReply {
    #[serde(rename = "replyCode", default)]
    pub reply_code: i64,
    #[serde(rename = "replyText", default)]
    pub reply_text: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: SuiteReply,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            body: SuiteReply {
                reply_code: 0,
                reply_text: "OK".to_string(),
                data,
            },
        }
    }

    /// Decode the `data` member into a typed value.
    pub fn data<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.body.data.clone())?)
    }
}

#[async_trait]
pub trait SuiteRequest: Send + Sync {
    async fn get(
        &self,
        customer_id: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError>;

    async fn post(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError>;

    async fn put(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError>;
}

/// reqwest transport for the Suite internal API.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    client: reqwest::Client,
    api_url: String,
    api_user: String,
    api_secret: String,
    retry: RetryConfig,
}

impl HttpRequest {
    pub fn new(client: reqwest::Client, config: &SuiteConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_user: config.api_user.clone(),
            api_secret: config.api_secret.clone(),
            retry: RetryConfig::api_call(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, customer_id: &str, path: &str, options: &RequestOptions) -> String {
        let base = match options.host.as_deref() {
            Some(host) if host.contains("://") => host.to_string(),
            Some(host) => format!("https://{}", host),
            None => self.api_url.clone(),
        };
        format!(
            "{}/api/v2/internal/{}{}",
            base.trim_end_matches('/'),
            customer_id,
            path
        )
    }

    async fn send(
        &self,
        method: Method,
        customer_id: &str,
        path: &str,
        payload: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(customer_id, path, options);
        debug!("Suite API {} {}", method, url);

        with_retry_if(
            &self.retry,
            &format!("Suite API {} {}", method, path),
            || async {
                let mut request = self
                    .client
                    .request(method.clone(), url.as_str())
                    .basic_auth(&self.api_user, Some(&self.api_secret));
                if let Some(payload) = payload {
                    request = request.json(payload);
                }

                let response = request.send().await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                    return Err(ApiError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }

                let bytes = response.bytes().await?;
                let body: SuiteReply = serde_json::from_slice(&bytes)?;
                if body.reply_code != 0 {
                    return Err(ApiError::Reply {
                        code: body.reply_code,
                        text: body.reply_text,
                    });
                }

                Ok::<_, ApiError>(ApiResponse {
                    status: status.as_u16(),
                    body,
                })
            },
            ApiError::is_retryable,
        )
        .await
    }
}

#[async_trait]
impl SuiteRequest for HttpRequest {
    async fn get(
        &self,
        customer_id: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, customer_id, path, None, options).await
    }

    async fn post(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, customer_id, path, Some(payload), options)
            .await
    }

    async fn put(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Method::PUT, customer_id, path, Some(payload), options)
            .await
    }
}

/// `(scope, host override, customer id, path)`
type ResponseKey = (String, Option<String>, String, String);

/// GET responses shared between [`CachedRequest`]s. Entries live until
/// their scope is evicted.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<ResponseKey, ApiResponse>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every response stored for `scope`.
    pub async fn evict_scope(&self, scope: &str) {
        self.entries.write().await.retain(|(s, _, _, _), _| s != scope);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Memoizes successful GETs for one scope; writes always pass through.
pub struct CachedRequest {
    inner: Arc<dyn SuiteRequest>,
    scope: String,
    cache: ResponseCache,
}

impl CachedRequest {
    pub fn new(inner: Arc<dyn SuiteRequest>, scope: impl Into<String>, cache: ResponseCache) -> Self {
        Self {
            inner,
            scope: scope.into(),
            cache,
        }
    }
}

#[async_trait]
impl SuiteRequest for CachedRequest {
    async fn get(
        &self,
        customer_id: &str,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let key = (
            self.scope.clone(),
            options.host.clone(),
            customer_id.to_string(),
            path.to_string(),
        );
        if let Some(hit) = self.cache.entries.read().await.get(&key) {
            debug!("Suite API cache hit for {} (scope {})", path, self.scope);
            return Ok(hit.clone());
        }

        let response = self.inner.get(customer_id, path, options).await?;
        self.cache
            .entries
            .write()
            .await
            .insert(key, response.clone());
        Ok(response)
    }

    async fn post(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.inner.post(customer_id, path, payload, options).await
    }

    async fn put(
        &self,
        customer_id: &str,
        path: &str,
        payload: &Value,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.inner.put(customer_id, path, payload, options).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// One call seen by [`RecordingRequest`].
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct RecordedCall {
        pub method: &'static str,
        pub customer_id: String,
        pub path: String,
        pub payload: Option<Value>,
    }

    /// In-memory [`SuiteRequest`] that records calls and answers with a
    /// fixed `data` value.
    #[derive(Default)]
    pub(crate) struct RecordingRequest {
        pub calls: Mutex<Vec<RecordedCall>>,
        pub data: Value,
    }

    impl RecordingRequest {
        pub(crate) fn answering(data: Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                data,
            }
        }

        pub(crate) fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, customer_id: &str, path: &str, payload: Option<&Value>) -> ApiResponse {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                customer_id: customer_id.to_string(),
                path: path.to_string(),
                payload: payload.cloned(),
            });
            ApiResponse::ok(self.data.clone())
        }
    }

    #[async_trait]
    impl SuiteRequest for RecordingRequest {
        async fn get(&self, customer_id: &str, path: &str, _: &RequestOptions) -> Result<ApiResponse, ApiError> {
            Ok(self.record("GET", customer_id, path, None))
        }

        async fn post(&self, customer_id: &str, path: &str, payload: &Value, _: &RequestOptions) -> Result<ApiResponse, ApiError> {
            Ok(self.record("POST", customer_id, path, Some(payload)))
        }

        async fn put(&self, customer_id: &str, path: &str, payload: &Value, _: &RequestOptions) -> Result<ApiResponse, ApiError> {
            Ok(self.record("PUT", customer_id, path, Some(payload)))
        }
    }
}

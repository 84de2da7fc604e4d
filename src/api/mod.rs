//! Suite API client.
//!
//! [`SuiteApi`] bundles the endpoint wrappers over one [`SuiteRequest`].
//! [`SuiteApiFactory`] hands out clients, optionally with GET responses
//! cached for a scope id (one inbound request).
//!
//! ```rust,ignore
//! let factory = SuiteApiFactory::from_config(&config)?;
//! let api = factory.create_with_cache("request-5");
//! let admin = api
//!     .administrator
//!     .get_administrator(&AdministratorQuery::new("21"), &RequestOptions::for_customer("12"))
//!     .await?;
//! ```

pub mod endpoints;
mod error;
pub mod request;

pub use endpoints::{
    Administrator, AdministratorApi, AdministratorQuery, Administrators, AutomationCenter,
    Contact, Keyring,
};
pub use error::ApiError;
pub use request::{
    ApiResponse, CachedRequest, HttpRequest, RequestOptions, ResponseCache, SuiteReply,
    SuiteRequest,
};

use crate::config::SuiteConfig;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SuiteApi {
    pub administrator: Administrators,
    pub contact: Contact,
    pub keyring: Keyring,
    pub automation_center: AutomationCenter,
}

impl SuiteApi {
    pub fn create(request: Arc<dyn SuiteRequest>, customer_id: Option<String>) -> Self {
        Self {
            administrator: Administrators::create(request.clone(), customer_id.clone()),
            contact: Contact::create(request.clone(), customer_id.clone()),
            keyring: Keyring::create(request.clone(), customer_id.clone()),
            automation_center: AutomationCenter::create(request, customer_id),
        }
    }
}

#[async_trait]
impl AdministratorApi for SuiteApi {
    async fn get_administrator(
        &self,
        query: &AdministratorQuery,
        options: &RequestOptions,
    ) -> Result<Administrator, ApiError> {
        self.administrator.get_administrator(query, options).await
    }
}

/// Source of administrator lookups scoped to one inbound request.
#[async_trait]
pub trait ApiFactory: Send + Sync {
    fn create_with_cache(&self, scope: &str) -> Arc<dyn AdministratorApi>;

    /// Drop whatever was cached for `scope`. Called once the request that
    /// owns the scope has finished.
    async fn release_scope(&self, _scope: &str) {}
}

#[derive(Clone)]
pub struct SuiteApiFactory {
    request: Arc<dyn SuiteRequest>,
    cache: ResponseCache,
    customer_id: Option<String>,
}

impl SuiteApiFactory {
    pub fn new(request: Arc<dyn SuiteRequest>) -> Self {
        Self {
            request,
            cache: ResponseCache::new(),
            customer_id: None,
        }
    }

    pub fn from_config(config: &SuiteConfig) -> anyhow::Result<Self> {
        let request = HttpRequest::new(config.http_client()?, config);
        Ok(Self::new(Arc::new(request)))
    }

    /// Customer used when call options do not name one.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn response_cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn create(&self) -> SuiteApi {
        SuiteApi::create(self.request.clone(), self.customer_id.clone())
    }

    pub fn create_with_cache(&self, scope: &str) -> SuiteApi {
        let cached = CachedRequest::new(self.request.clone(), scope, self.cache.clone());
        SuiteApi::create(Arc::new(cached), self.customer_id.clone())
    }
}

#[async_trait]
impl ApiFactory for SuiteApiFactory {
    fn create_with_cache(&self, scope: &str) -> Arc<dyn AdministratorApi> {
        Arc::new(SuiteApiFactory::create_with_cache(self, scope))
    }

    async fn release_scope(&self, scope: &str) {
        self.cache.evict_scope(scope).await;
    }
}

use crate::api::{AdministratorQuery, ApiError, ApiFactory, RequestOptions};
use std::sync::Arc;
use tracing::debug;

/// Answers whether an administrator has superadmin rights.
#[derive(Clone)]
pub struct SuperadminChecker {
    api: Arc<dyn ApiFactory>,
}

impl SuperadminChecker {
    pub fn new(api: Arc<dyn ApiFactory>) -> Self {
        Self { api }
    }

    /// Lookups share the response cache of `scope`, which the scope owner
    /// releases with [`ApiFactory::release_scope`].
    pub async fn is_superadmin(
        &self,
        customer_id: &str,
        admin_id: &str,
        scope: &str,
    ) -> Result<bool, ApiError> {
        let admin = self
            .api
            .create_with_cache(scope)
            .get_administrator(
                &AdministratorQuery::new(admin_id),
                &RequestOptions::for_customer(customer_id),
            )
            .await?;

        let superadmin = admin.is_superadmin();
        debug!(
            "Administrator {} of customer {} superadmin: {}",
            admin_id, customer_id, superadmin
        );
        Ok(superadmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::testing::RecordingRequest;
    use crate::api::SuiteApiFactory;
    use serde_json::json;

    fn checker(data: serde_json::Value) -> (SuperadminChecker, Arc<RecordingRequest>) {
        let request = Arc::new(RecordingRequest::answering(data));
        let factory = SuiteApiFactory::new(request.clone());
        (SuperadminChecker::new(Arc::new(factory)), request)
    }

    #[tokio::test]
    async fn test_superadmin_flag_set() {
        let (checker, request) = checker(json!({"id": 21, "superadmin": 1}));

        assert!(checker.is_superadmin("12", "21", "req-1").await.unwrap());

        let calls = request.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].customer_id, "12");
        assert_eq!(calls[0].path, "/administrator/21");
    }

    #[tokio::test]
    async fn test_superadmin_flag_unset() {
        let (checker, _) = checker(json!({"id": 21, "superadmin": "0"}));

        assert!(!checker.is_superadmin("12", "21", "req-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_scope_hits_cache() {
        let (checker, request) = checker(json!({"id": 21, "superadmin": true}));

        checker.is_superadmin("12", "21", "req-7").await.unwrap();
        checker.is_superadmin("12", "21", "req-7").await.unwrap();

        assert_eq!(request.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_admin_id_is_rejected() {
        let (checker, request) = checker(json!({}));

        let result = checker.is_superadmin("12", " ", "req-1").await;

        assert!(matches!(result, Err(ApiError::MissingParameters(_))));
        assert!(request.calls().is_empty());
    }
}

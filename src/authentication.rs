//! Signed-URL authentication for inbound Suite requests.
//!
//! Verification is delegated to a [`SignedUrlAuthenticator`]. On success the
//! request parameters become the request's [`ValidatedData`]: the query
//! string for body-less methods, the JSON or form body otherwise.

use crate::validated_data::ValidatedData;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AuthenticationError(pub String);

/// Checks the signature carried by a request URL.
pub trait SignedUrlAuthenticator: Send + Sync {
    /// `url` is the path and query as received; `host` the Host header.
    fn authenticate(&self, url: &str, host: &str) -> Result<(), AuthenticationError>;
}

#[derive(Debug, Error)]
pub enum SignedUrlRejection {
    #[error("{0}")]
    Unauthorized(#[from] AuthenticationError),

    #[error("invalid request parameters: {0}")]
    InvalidParameters(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for SignedUrlRejection {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            SignedUrlRejection::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            SignedUrlRejection::InvalidParameters(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let body = Json(ErrorBody {
            error,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Layer state for [`signed_url_layer`].
#[derive(Clone)]
pub struct SignedUrlState {
    authenticator: Arc<dyn SignedUrlAuthenticator>,
}

impl SignedUrlState {
    pub fn new(authenticator: Arc<dyn SignedUrlAuthenticator>) -> Self {
        Self { authenticator }
    }
}

/// `from_fn_with_state` middleware: 401 on a bad signature, otherwise
/// inserts [`ValidatedData`] and continues.
pub async fn signed_url_layer(
    State(state): State<SignedUrlState>,
    request: Request,
    next: Next,
) -> Result<Response, SignedUrlRejection> {
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let host = host(request.headers());

    if let Err(e) = state.authenticator.authenticate(&url, &host) {
        warn!("Signed URL authentication failed for {}: {}", url, e);
        return Err(e.into());
    }

    let (mut parts, body) = request.into_parts();
    let (validated, body) = if carries_body(&parts.method) {
        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| SignedUrlRejection::InvalidParameters(e.to_string()))?;
        let validated = from_body(&parts.headers, &bytes)?;
        (validated, Body::from(bytes))
    } else {
        (from_query(parts.uri.query())?, body)
    };

    debug!("Authenticated {} {}", parts.method, url);
    parts.extensions.insert(validated);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

fn from_query(query: Option<&str>) -> Result<ValidatedData, SignedUrlRejection> {
    let pairs = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()).into_owned();
    ValidatedData::from_pairs(pairs).map_err(|e| SignedUrlRejection::InvalidParameters(e.to_string()))
}

fn from_body(headers: &HeaderMap, bytes: &[u8]) -> Result<ValidatedData, SignedUrlRejection> {
    if bytes.is_empty() {
        return Ok(ValidatedData::default());
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let parsed = if content_type.starts_with("application/x-www-form-urlencoded") {
        ValidatedData::from_pairs(url::form_urlencoded::parse(bytes).into_owned())
    } else {
        serde_json::from_slice::<Value>(bytes).and_then(ValidatedData::from_value)
    };
    parsed.map_err(|e| SignedUrlRejection::InvalidParameters(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_from_query_decodes_pairs() {
        let data = from_query(Some("queryPar1=1&queryPar2=2&language=mx")).unwrap();

        assert_eq!(data.language(), Some("mx"));
        assert_eq!(data.extra.get("queryPar1"), Some(&Value::from("1")));
        assert_eq!(data.extra.get("queryPar2"), Some(&Value::from("2")));
    }

    #[test]
    fn test_from_query_without_query_is_empty() {
        assert_eq!(from_query(None).unwrap(), ValidatedData::default());
    }

    #[test]
    fn test_from_body_json_and_form() {
        let mut headers = HeaderMap::new();
        let json = from_body(&headers, br#"{"bodyPar1": "1", "customer_id": 12}"#).unwrap();
        assert_eq!(json.customer_id(), Some("12"));
        assert_eq!(json.extra.get("bodyPar1"), Some(&Value::from("1")));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let form = from_body(&headers, b"bodyPar2=2&environment=suite.test").unwrap();
        assert_eq!(form.environment(), Some("suite.test"));
        assert_eq!(form.extra.get("bodyPar2"), Some(&Value::from("2")));
    }

    #[test]
    fn test_from_body_rejects_invalid_json() {
        let result = from_body(&HeaderMap::new(), b"{not json");
        assert!(matches!(result, Err(SignedUrlRejection::InvalidParameters(_))));
    }

    #[test]
    fn test_body_methods() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PUT));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::HEAD));
    }
}

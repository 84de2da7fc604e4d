use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failures that stop a request before the downstream handler runs.
///
/// Upstream problems (administrator lookup, dictionary fetch) never show up
/// here; they fall back to the default language or an empty dictionary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("decorateRenderWithTranslations middleware need validatedData from request's")]
    MissingValidatedData,

    #[error("decorateRenderWithTranslations middleware need environment from request's validatedData")]
    MissingEnvironment,

    #[error("decorateRenderWithTranslations middleware need a translation id")]
    MissingTranslationId,
}

impl TranslationError {
    /// Missing environment is the caller's fault; the other two mean the
    /// route was wired without authentication or a translation id.
    pub fn status(&self) -> StatusCode {
        match self {
            TranslationError::MissingEnvironment => StatusCode::BAD_REQUEST,
            TranslationError::MissingValidatedData | TranslationError::MissingTranslationId => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_required_parameter_missing(&self) -> bool {
        matches!(
            self,
            TranslationError::MissingEnvironment | TranslationError::MissingTranslationId
        )
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for TranslationError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: match self {
                TranslationError::MissingValidatedData => "missing_validated_data",
                TranslationError::MissingEnvironment => "missing_environment",
                TranslationError::MissingTranslationId => "missing_translation_id",
            },
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TranslationError::MissingValidatedData.to_string(),
            "decorateRenderWithTranslations middleware need validatedData from request's"
        );
        assert_eq!(
            TranslationError::MissingEnvironment.to_string(),
            "decorateRenderWithTranslations middleware need environment from request's validatedData"
        );
    }

    #[test]
    fn test_required_parameter_flavors() {
        assert!(TranslationError::MissingEnvironment.is_required_parameter_missing());
        assert!(TranslationError::MissingTranslationId.is_required_parameter_missing());
        assert!(!TranslationError::MissingValidatedData.is_required_parameter_missing());
    }

    #[test]
    fn test_into_response_status() {
        assert_eq!(
            TranslationError::MissingEnvironment.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TranslationError::MissingTranslationId.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

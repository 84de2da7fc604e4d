use thiserror::Error;

/// Errors returned by the Suite API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter(s): {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    #[error("Customer id is required for Suite API requests")]
    MissingCustomerId,

    #[error("Failed to send request to Suite API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Suite API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Suite API replied with code {code}: {text}")]
    Reply { code: i64, text: String },

    #[error("Failed to decode Suite API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid Suite API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Transport failures, 429 and 5xx responses are retried; everything
    /// else is a caller or contract problem.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(e) => !e.is_decode() && !e.is_builder(),
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message_lists_names() {
        let err = ApiError::MissingParameters(vec!["key_id".to_string(), "comment".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required parameter(s): key_id, comment"
        );
    }

    #[test]
    fn test_status_retryability() {
        let retryable = |status| ApiError::Status {
            status,
            body: String::new(),
        }
        .is_retryable();

        assert!(retryable(500));
        assert!(retryable(503));
        assert!(retryable(429));
        assert!(!retryable(400));
        assert!(!retryable(404));
    }

    #[test]
    fn test_validation_errors_are_not_retryable() {
        assert!(!ApiError::MissingCustomerId.is_retryable());
        assert!(!ApiError::MissingParameters(vec![]).is_retryable());
        assert!(!ApiError::Reply {
            code: 1,
            text: "bad".into()
        }
        .is_retryable());
    }
}

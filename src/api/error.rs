//! API error handling for consistent JSON error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::share::ShareError;
use crate::summarize::{CompletionError, SummarizeError};

/// Every failure a request can end in.
///
/// Each variant maps to one HTTP status; the body is always
/// `{"error": <message>, "success": false}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller sent missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The deployment lacks something the request needs.
    #[error("{0}")]
    Configuration(String),

    /// The upstream service answered with a non-success status.
    #[error("Upstream API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    /// The upstream service could not be reached in time.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Unknown(String),
}

/// Failure body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub success: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_)
            | Self::Upstream { .. }
            | Self::Network(_)
            | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
            success: false,
        });
        (self.status(), body).into_response()
    }
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::Upstream { status, body } => Self::Upstream { status, body },
            CompletionError::Network(message) => Self::Network(message),
            err @ CompletionError::Request(_) => Self::Unknown(err.to_string()),
            CompletionError::InvalidResponse(message) => Self::Unknown(message),
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::MissingTranscript => Self::Validation(err.to_string()),
            SummarizeError::NotConfigured => Self::Configuration(err.to_string()),
            SummarizeError::Completion(e) => e.into(),
        }
    }
}

impl From<ShareError> for ApiError {
    fn from(err: ShareError) -> Self {
        match err {
            ShareError::MissingFields => Self::Validation(err.to_string()),
            ShareError::Delivery(e) => Self::Unknown(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(SummarizeError::MissingTranscript).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ShareError::MissingFields).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SummarizeError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Network("timed out".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unknown("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_contains_status_and_body() {
        let err = ApiError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("rate limited"));
    }

    #[test]
    fn test_completion_error_mapping() {
        let err: ApiError = CompletionError::Network("connection refused".into()).into();
        assert!(matches!(err, ApiError::Network(_)));
        assert!(err.to_string().contains("connection refused"));

        let err: ApiError = CompletionError::InvalidResponse("no choices".into()).into();
        assert!(matches!(err, ApiError::Unknown(_)));
        assert_eq!(err.to_string(), "no choices");
    }

    #[test]
    fn test_request_build_failure_is_unknown_not_network() {
        let err: ApiError =
            CompletionError::Request("relative URL without a base".into()).into();
        assert!(matches!(err, ApiError::Unknown(_)));
        assert!(!err.to_string().starts_with("Network error"));
        assert!(err.to_string().contains("relative URL without a base"));
    }

    #[test]
    fn test_share_delivery_failure_is_unknown() {
        let err: ApiError = ShareError::Delivery(anyhow::anyhow!("SMTP down")).into();
        assert!(matches!(err, ApiError::Unknown(_)));
        assert_eq!(err.to_string(), "SMTP down");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::from(SummarizeError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "AI service is not available");
        assert_eq!(value["success"], false);
    }
}

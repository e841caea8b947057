use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid upstream response: {0}")]
    UpstreamShape(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => AppError::Configuration(err.to_string()),
            LlmError::InvalidShape(_) => AppError::UpstreamShape(err.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } => AppError::Upstream(err.to_string()),
            LlmError::Serialize(e) => AppError::Internal(e.into()),
        }
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            AppError::UpstreamShape(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_SHAPE_ERROR")
            }
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "A storage error occurred".to_string()
            }
            AppError::Configuration(_) | AppError::Upstream(_) | AppError::UpstreamShape(_) => {
                tracing::error!("Error analyzing repository: {self}");
                format!("Failed to analyze repository: {self}")
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_maps_to_configuration() {
        let err: AppError = LlmError::MissingApiKey.into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
        );
    }

    #[test]
    fn test_invalid_shape_maps_to_upstream_shape() {
        let err: AppError = LlmError::InvalidShape("no candidates".to_string()).into();
        assert!(matches!(err, AppError::UpstreamShape(_)));
    }

    #[test]
    fn test_api_error_maps_to_upstream() {
        let err: AppError = LlmError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Upstream(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::Validation("Missing repoUrl in request body".to_string());
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }
}

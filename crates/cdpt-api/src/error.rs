use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cdpt_providers::ProviderError;
use cdpt_storage::StorageError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Third-party non-success response, forwarded as received
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{message}: {source}")]
    Provider {
        message: &'static str,
        #[source]
        source: ProviderError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Map a storage failure, using `message` as the client-facing text for
    /// failures that are not the caller's fault.
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> ApiError {
        move |source| match source {
            StorageError::Validation(msg) => ApiError::BadRequest(msg),
            StorageError::NotFound(msg) => ApiError::NotFound(msg),
            StorageError::Upstream { status, body } => ApiError::upstream(status, body),
            source => ApiError::Storage { message, source },
        }
    }

    /// Provider counterpart of [`ApiError::storage`].
    pub fn provider(message: &'static str) -> impl FnOnce(ProviderError) -> ApiError {
        move |source| match source {
            ProviderError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ProviderError::Upstream { status, body, .. } => ApiError::upstream(status, body),
            source => ApiError::Provider { message, source },
        }
    }

    fn upstream(status: u16, body: String) -> ApiError {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
        ApiError::Upstream { status, body }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream { status, body } => {
                tracing::warn!(status = %status, "Forwarding upstream error");
                return match serde_json::from_str::<serde_json::Value>(&body) {
                    Ok(value) => (status, Json(value)).into_response(),
                    Err(_) => (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
                        .into_response(),
                };
            }
            ApiError::Storage { message, ref source } => {
                tracing::error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            ApiError::Provider { message, ref source } => {
                tracing::error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            ApiError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_validation_is_bad_request() {
        let err = ApiError::storage("Failed to save chat history")(StorageError::Validation(
            "identifier is required".to_string(),
        ));
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_decode_is_generic_500() {
        let err = ApiError::storage("Failed to load chat history")(StorageError::Decode(
            "bad json".to_string(),
        ));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_status_is_forwarded() {
        let err = ApiError::provider("Failed to fetch token")(ProviderError::Upstream {
            provider: "Discord",
            status: 401,
            body: "{}".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_upstream_status_becomes_bad_gateway() {
        let err = ApiError::storage("Failed to load chat history")(StorageError::Upstream {
            status: 42,
            body: String::new(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::storage("Failed to load chat history")(StorageError::NotFound(
            "nothing stored".to_string(),
        ));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}

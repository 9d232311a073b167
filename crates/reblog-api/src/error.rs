use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reblog_curator::CuratorError;
use reblog_discord::SourceError;
use reblog_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Discord request failed: {0}")]
    Upstream(SourceError),

    #[error("Storage error: {0}")]
    Store(PersistError),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Upstream(other),
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Validation(msg) => ApiError::BadRequest(msg),
            PersistError::EntryNotFound(id) => ApiError::NotFound(format!("reblog entry {}", id)),
            other => ApiError::Store(other),
        }
    }
}

impl From<CuratorError> for ApiError {
    fn from(err: CuratorError) -> Self {
        match err {
            CuratorError::Validation(msg) => ApiError::BadRequest(msg),
            CuratorError::Upstream(e) => e.into(),
            CuratorError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Upstream(ref e) => {
                tracing::error!("Discord error: {}", e);
                (StatusCode::BAD_GATEWAY, "Discord request failed".to_string())
            }
            ApiError::Store(ref e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

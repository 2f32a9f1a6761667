use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use gamelist_core::{StoreError, ValidationError};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    UnprocessableEntity(String),
    ServiceUnavailable(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m)
            | Self::NotFound(m)
            | Self::UnprocessableEntity(m)
            | Self::ServiceUnavailable(m) => write!(f, "{m}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            Self::UnprocessableEntity(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
            Self::ServiceUnavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        tracing::debug!(field = err.field, reason = ?err.reason, "Rejected game payload");
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound("Game not found".to_string()),
            StoreError::MalformedIdentifier(_) => Self::UnprocessableEntity("Invalid ID".to_string()),
            StoreError::StoreUnavailable(detail) => {
                tracing::error!(%detail, "Game store unavailable");
                Self::ServiceUnavailable("Game storage is unavailable".to_string())
            },
        }
    }
}

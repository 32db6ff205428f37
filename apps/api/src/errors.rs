use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single analysis or comparison call.
///
/// Each variant carries the fixed user-facing message. The underlying cause is
/// logged where it happens and never travels with the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreeningError {
    /// The remote model answered, but not with the requested structure.
    #[error("{0}")]
    MalformedResponse(String),

    /// Network, authentication, or service-side failure.
    #[error("{0}")]
    TransportFailure(String),

    #[error("At least 2 candidates are required for a comparison (got {0})")]
    NotEnoughCandidates(usize),
}

impl ScreeningError {
    pub fn code(&self) -> &'static str {
        match self {
            ScreeningError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            ScreeningError::TransportFailure(_) => "TRANSPORT_FAILURE",
            ScreeningError::NotEnoughCandidates(_) => "NOT_ENOUGH_CANDIDATES",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Screening(#[from] ScreeningError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Screening(e) => {
                let status = match e {
                    ScreeningError::MalformedResponse(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ScreeningError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
                    ScreeningError::NotEnoughCandidates(_) => StatusCode::CONFLICT,
                };
                (status, e.code(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// A failure in the AI generation pipeline (prompt → model → parse →
/// validate). Safe to retry the whole creation request: no partial
/// assessment is persisted when one of these surfaces.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, auth, rate-limit, or empty-response failure from the
    /// external generation service.
    #[error("upstream generation failure: {0}")]
    Upstream(String),

    /// No JSON object could be located in the model output.
    #[error("no JSON object found in model output")]
    Parse,

    /// A located JSON object is missing one of the required top-level
    /// result fields.
    #[error("model output missing required field: {0}")]
    Schema(&'static str),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Upstream(_) => "upstream",
            GenerationError::Parse => "parse",
            GenerationError::Schema(_) => "schema",
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

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => {
                // Upstream detail stays in the logs; the client gets a
                // generic retryable message.
                tracing::error!("Generation error (kind={}): {e}", e.kind());
                (
                    StatusCode::BAD_GATEWAY,
                    "GENERATION_ERROR",
                    "AI service temporarily unavailable. Please try again.".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
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

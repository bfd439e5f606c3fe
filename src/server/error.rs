//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Error message for storage failures.
pub const STORAGE_FAILED_MESSAGE: &str = "Failed to save generated content";

/// JSON error body: `{"error": ..., "details": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Short description of what failed.
    pub error: String,
    /// Underlying error message, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Map a pipeline error; `generation_message` labels completion failures.
    #[must_use]
    pub fn from_pipeline(err: PipelineError, generation_message: &str) -> Self {
        match err {
            PipelineError::InvalidInput(e) => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody {
                    error: e.to_string(),
                    details: None,
                },
            },
            PipelineError::GenerationFailed(e) => Self::internal(generation_message, &e),
            PipelineError::StorageFailed(e) => Self::internal(STORAGE_FAILED_MESSAGE, &e),
        }
    }

    fn internal(message: &str, err: &dyn std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: message.to_string(),
                details: Some(err.to_string()),
            },
        }
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

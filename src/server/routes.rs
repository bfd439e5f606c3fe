//! HTTP route handlers for the reelgen API.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::pipeline::{GenerationRequest, Materialized};

use super::error::ApiError;
use super::state::AppState;

/// Error label for failed story generation.
pub const STORY_FAILED_MESSAGE: &str = "Failed to generate content using Gemini API";
/// Error label for failed haiku generation.
pub const HAIKU_FAILED_MESSAGE: &str = "Failed to generate haiku";
/// Success message for stored stories.
pub const STORY_SAVED_MESSAGE: &str = "Content generated and saved successfully";

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/test", get(liveness))
        .route("/create-story", get(create_story))
        .route("/generate-haiku", get(generate_haiku))
        .with_state(state)
}

/// Liveness endpoint.
async fn liveness() -> impl IntoResponse {
    Json("test ok")
}

/// Query string of `/create-story`.
#[derive(Debug, Deserialize)]
pub struct CreateStoryQuery {
    /// Page to summarize.
    pub url: Option<String>,
}

/// Success body of `/create-story`.
#[derive(Debug, Serialize)]
pub struct StoryResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Human-readable outcome.
    pub message: &'static str,
}

/// Render a pipeline result: stored stories get a status body, inline
/// completions are returned as a JSON string.
fn materialized_response(materialized: Materialized) -> Response {
    match materialized {
        Materialized::Stored { .. } => Json(StoryResponse {
            status: "ok",
            message: STORY_SAVED_MESSAGE,
        })
        .into_response(),
        Materialized::Inline(text) => Json(text).into_response(),
    }
}

/// Summarize the page at `url` into three stored parts.
async fn create_story(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateStoryQuery>,
) -> Result<Response, ApiError> {
    tracing::info!(url = ?query.url, "create-story requested");

    state
        .pipeline
        .run(GenerationRequest::summarize_url(query.url))
        .await
        .map(materialized_response)
        .map_err(|e| ApiError::from_pipeline(e, STORY_FAILED_MESSAGE))
}

/// Generate a haiku and return it as a JSON string.
async fn generate_haiku(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state
        .pipeline
        .run(GenerationRequest::haiku())
        .await
        .map(materialized_response)
        .map_err(|e| ApiError::from_pipeline(e, HAIKU_FAILED_MESSAGE))
}

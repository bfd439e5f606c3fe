//! Completion client abstraction.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::Prompt;

/// Errors produced by a completion call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure talking to the provider.
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// HTTP client configuration error.
    #[error("http client error: {0}")]
    HttpClient(String),
    /// The call did not finish in time.
    #[error("generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// The provider answered with a non-success status.
    #[error("completion API returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("malformed completion payload: {0}")]
    MalformedPayload(String),
    /// The provider refused to answer.
    #[error("generation blocked: {0}")]
    Blocked(String),
    /// The response carried no candidate text.
    #[error("completion contained no text")]
    EmptyCompletion,
}

/// Convenience result alias for completion calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// A text-completion capability: one prompt in, one completion out.
///
/// Implementations make exactly one upstream call per invocation and must
/// not cache results.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for `prompt`, returned exactly as produced.
    async fn generate(&self, prompt: &Prompt) -> GenerationResult<String>;

    /// Human-readable provider/model label used in logs.
    fn describe(&self) -> String;
}

//! Generation pipeline: prompt, completion call, materialization.
//!
//! Each request is a single linear pass with at most one upstream call and at
//! most one write batch. Nothing is shared between requests except the
//! injected client and the story root directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::llm::{CompletionClient, GenerationError};
use crate::prompt::{PromptError, PromptKind, build_prompt};
use crate::story::{StorageError, StorageKey, StoryStore, split_story};

/// Errors surfaced by the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request input was missing or invalid.
    #[error(transparent)]
    InvalidInput(#[from] PromptError),
    /// The completion call failed.
    #[error(transparent)]
    GenerationFailed(#[from] GenerationError),
    /// Persisting the story failed.
    #[error(transparent)]
    StorageFailed(#[from] StorageError),
}

/// Convenience result alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// How the completion is handed back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Split into three parts and persist under a fresh key.
    SplitToFiles,
    /// Return the completion unchanged.
    InlineJson,
}

/// One unit of work for the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Prompt kind and its input.
    pub kind: PromptKind,
    /// Output mode.
    pub output_mode: OutputMode,
}

impl GenerationRequest {
    /// Summarize `url` into a stored three-part story.
    #[must_use]
    pub fn summarize_url(url: Option<String>) -> Self {
        Self {
            kind: PromptKind::SummarizeUrl(url.unwrap_or_default()),
            output_mode: OutputMode::SplitToFiles,
        }
    }

    /// Fixed haiku prompt returned inline.
    #[must_use]
    pub const fn haiku() -> Self {
        Self {
            kind: PromptKind::FixedPrompt,
            output_mode: OutputMode::InlineJson,
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Materialized {
    /// Story written to disk.
    Stored {
        /// Key the story was stored under.
        key: StorageKey,
        /// Story directory.
        dir: PathBuf,
    },
    /// Completion returned unchanged.
    Inline(String),
}

/// Runs generation requests against an injected completion client.
pub struct StoryPipeline {
    client: Arc<dyn CompletionClient>,
    store: StoryStore,
    timeout: Duration,
}

impl StoryPipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, store: StoryStore, timeout: Duration) -> Self {
        Self {
            client,
            store,
            timeout,
        }
    }

    /// Story store used for `SplitToFiles` requests.
    #[must_use]
    pub const fn store(&self) -> &StoryStore {
        &self.store
    }

    /// Run one request end to end.
    ///
    /// # Errors
    /// Returns [`PipelineError`] on invalid input, a failed or timed-out
    /// completion call, or a failed write. Nothing is persisted on error.
    pub async fn run(&self, request: GenerationRequest) -> PipelineResult<Materialized> {
        let completion = self.complete(&request.kind).await?;
        match request.output_mode {
            OutputMode::InlineJson => Ok(Materialized::Inline(completion)),
            OutputMode::SplitToFiles => {
                let (key, dir) = self.persist(&completion).await?;
                Ok(Materialized::Stored { key, dir })
            }
        }
    }

    /// Build the prompt and make the single, time-bounded completion call.
    async fn complete(&self, kind: &PromptKind) -> PipelineResult<String> {
        let prompt = build_prompt(kind)?;

        info!("Generating content with {}", self.client.describe());
        match tokio::time::timeout(self.timeout, self.client.generate(&prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                error!("Generation failed: {e}");
                Err(e.into())
            }
            Err(_) => {
                error!("Generation timed out after {:?}", self.timeout);
                Err(GenerationError::Timeout(self.timeout).into())
            }
        }
    }

    /// Split `completion` and write it under a freshly allocated key.
    async fn persist(&self, completion: &str) -> PipelineResult<(StorageKey, PathBuf)> {
        let key = StorageKey::generate();
        let parts = split_story(completion);
        let dir = self
            .store
            .write(key, &parts)
            .await
            .inspect_err(|e| error!("Failed to store story {key}: {e}"))?;
        info!("Story {key} saved to {}", dir.display());
        Ok((key, dir))
    }
}

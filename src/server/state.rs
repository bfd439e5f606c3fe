//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::llm::{CompletionClient, GeminiClient, GenerationError};
use crate::pipeline::StoryPipeline;
use crate::story::StoryStore;

/// Shared application state.
pub struct AppState {
    /// Generation pipeline with its injected completion client.
    pub pipeline: StoryPipeline,
}

impl AppState {
    /// Create state around an already configured completion client.
    #[must_use]
    pub fn with_client(client: Arc<dyn CompletionClient>, config: &ServiceConfig) -> Arc<Self> {
        let store = StoryStore::new(&config.stories_dir);
        let pipeline = StoryPipeline::new(client, store, config.generation_timeout);
        Arc::new(Self { pipeline })
    }

    /// Create state backed by the Gemini client.
    ///
    /// # Errors
    /// Returns an error if the Gemini client cannot be created.
    pub fn new(config: &ServiceConfig) -> Result<Arc<Self>, GenerationError> {
        let client = GeminiClient::new(config)?;
        tracing::info!("Gemini endpoint: {}", client.endpoint());
        Ok(Self::with_client(Arc::new(client), config))
    }
}

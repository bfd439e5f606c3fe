//! Scripted completion client for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::prompt::Prompt;

use super::client::{CompletionClient, GenerationError, GenerationResult};

enum Script {
    Text(String),
    Fail(String),
    Hang,
}

/// Replays a fixed outcome and counts calls.
pub(crate) struct StubClient {
    script: Script,
    calls: AtomicUsize,
}

impl StubClient {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self::with(Script::Text(text.into()))
    }

    /// Fails every call with an upstream 500 carrying `message`.
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self::with(Script::Fail(message.into()))
    }

    /// Never completes.
    pub(crate) fn hanging() -> Self {
        Self::with(Script::Hang)
    }

    fn with(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn generate(&self, _prompt: &Prompt) -> GenerationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Text(text) => Ok(text.clone()),
            Script::Fail(message) => Err(GenerationError::Status {
                status: 500,
                message: message.clone(),
            }),
            Script::Hang => std::future::pending().await,
        }
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}

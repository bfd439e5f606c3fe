//! LLM-focused components: the completion abstraction and the Gemini client.

pub mod client;
pub mod gemini;
#[cfg(test)]
pub(crate) mod stub;

pub use client::{CompletionClient, GenerationError, GenerationResult};
pub use gemini::GeminiClient;

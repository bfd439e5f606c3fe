//! Prompt construction modules.

pub mod prompt_builder;

pub use prompt_builder::{HAIKU_PROMPT, Prompt, PromptError, PromptKind, build_prompt};

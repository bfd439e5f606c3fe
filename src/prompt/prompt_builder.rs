//! Prompt builder for generation requests.

use std::fmt;

use thiserror::Error;

/// Instruction sent for the fixed haiku prompt.
pub const HAIKU_PROMPT: &str = "write a haiku about ai";

/// Message returned when the URL is absent.
pub const MISSING_URL_MESSAGE: &str = "URL parameter is required";

/// Errors raised while building a prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// Required request input is missing or unusable.
    #[error("{0}")]
    InvalidInput(String),
}

/// What kind of prompt to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// Summarize the page behind a URL into a short three-part story.
    SummarizeUrl(String),
    /// The fixed haiku instruction; takes no input.
    FixedPrompt,
}

/// A fully rendered prompt. Opaque to everything but the completion API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Prompt text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render a deterministic prompt for `kind`.
///
/// # Errors
/// Returns [`PromptError::InvalidInput`] if the URL is absent or blank.
pub fn build_prompt(kind: &PromptKind) -> Result<Prompt, PromptError> {
    match kind {
        PromptKind::SummarizeUrl(raw) => {
            let url = normalize_url(raw)?;
            Ok(Prompt(render_summary(&url)))
        }
        PromptKind::FixedPrompt => Ok(Prompt(HAIKU_PROMPT.to_string())),
    }
}

/// Trim the URL and add an `https://` scheme to bare hosts such as
/// `example.com`. Anything non-blank is accepted; strings that do not parse
/// even with a scheme are passed through as typed.
fn normalize_url(raw: &str) -> Result<String, PromptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PromptError::InvalidInput(MISSING_URL_MESSAGE.to_string()));
    }
    if url::Url::parse(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }
    let with_scheme = format!("https://{trimmed}");
    if url::Url::parse(&with_scheme).is_ok() {
        return Ok(with_scheme);
    }
    Ok(trimmed.to_string())
}

fn render_summary(url: &str) -> String {
    let mut out = String::with_capacity(url.len() + 220);
    out.push_str("Browse to ");
    out.push_str(url);
    out.push_str(" and read the page contents. ");
    out.push_str("Create a tldr text version of it for an Instagram reel or a TikTok video. ");
    out.push_str("No emojis, max 100 words. ");
    out.push_str("Split the created text into 3 parts.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_url() {
        let prompt =
            build_prompt(&PromptKind::SummarizeUrl("https://example.com/post".into())).unwrap();
        assert_eq!(
            prompt.as_str(),
            "Browse to https://example.com/post and read the page contents. \
             Create a tldr text version of it for an Instagram reel or a TikTok video. \
             No emojis, max 100 words. Split the created text into 3 parts."
        );
    }

    #[test]
    fn test_summary_prompt_is_deterministic() {
        let kind = PromptKind::SummarizeUrl("https://example.com".into());
        assert_eq!(build_prompt(&kind), build_prompt(&kind));
    }

    #[test]
    fn test_empty_url_is_invalid() {
        let err = build_prompt(&PromptKind::SummarizeUrl("  ".into())).unwrap_err();
        assert_eq!(err, PromptError::InvalidInput(MISSING_URL_MESSAGE.to_string()));
    }

    #[test]
    fn test_bare_host_gets_https_scheme() {
        let prompt = build_prompt(&PromptKind::SummarizeUrl("example.com".into())).unwrap();
        assert!(prompt.as_str().starts_with("Browse to https://example.com and read"));

        let prompt =
            build_prompt(&PromptKind::SummarizeUrl("www.bbc.com/news/article".into())).unwrap();
        assert!(prompt.as_str().contains("https://www.bbc.com/news/article"));
    }

    #[test]
    fn test_unparsable_url_is_passed_through() {
        let prompt = build_prompt(&PromptKind::SummarizeUrl(" not a url ".into())).unwrap();
        assert!(prompt.as_str().starts_with("Browse to not a url and read"));
    }

    #[test]
    fn test_fixed_prompt() {
        let prompt = build_prompt(&PromptKind::FixedPrompt).unwrap();
        assert_eq!(prompt.as_str(), HAIKU_PROMPT);
        assert_eq!(prompt.to_string(), "write a haiku about ai");
    }
}

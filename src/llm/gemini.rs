//! Google Gemini `generateContent` client.
//!
//! Behaviour:
//! - One `POST {base}/v1beta/models/{model}:generateContent` per call, no retries.
//! - Credential travels in the `x-goog-api-key` header.
//! - The completion is the text of the first candidate, parts concatenated.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ServiceConfig;
use crate::prompt::Prompt;

use super::client::{CompletionClient, GenerationError, GenerationResult};

/// Connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Upper bound on how much of a raw error body is echoed back.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Async Gemini client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Build a client from the service configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> GenerationResult<Self> {
        let endpoint = build_endpoint(&config.gemini_base_url, &config.model)?;
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.generation_timeout)
            .build()
            .map_err(|e| GenerationError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.expose().to_string(),
            model: config.model.clone(),
            timeout: config.generation_timeout,
        })
    }

    /// Full `generateContent` URL this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> GenerationResult<String> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart {
                    text: prompt.as_str(),
                }],
            }],
        };

        debug!("POST {} ({} prompt chars)", self.endpoint, prompt.as_str().len());

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &text));
        }

        extract_text(&text)
    }

    fn describe(&self) -> String {
        format!("gemini:{}", self.model)
    }
}

impl GeminiClient {
    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            GenerationError::HttpRequest(err)
        }
    }
}

/// Join base URL and model into the `generateContent` endpoint.
fn build_endpoint(base_url: &str, model: &str) -> GenerationResult<String> {
    let base = url::Url::parse(base_url)
        .map_err(|e| GenerationError::HttpClient(format!("invalid Gemini base URL: {e}")))?;
    if model.trim().is_empty() || model.contains('/') {
        return Err(GenerationError::HttpClient(format!(
            "invalid Gemini model name: {model:?}"
        )));
    }
    let endpoint = base
        .join(&format!("v1beta/models/{model}:generateContent"))
        .map_err(|e| GenerationError::HttpClient(format!("invalid Gemini endpoint: {e}")))?;
    Ok(endpoint.to_string())
}

/// Turn a non-success response into an error, preferring the provider message.
fn status_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
        |envelope| envelope.error.message,
    );
    GenerationError::Status { status, message }
}

/// Extract the completion text from a `generateContent` response body.
fn extract_text(body: &str) -> GenerationResult<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedPayload(e.to_string()))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationError::Blocked(format!("prompt blocked ({reason})")));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyCompletion);
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some(reason) if reason != "STOP" => Err(GenerationError::Blocked(format!(
                "candidate finished with {reason}"
            ))),
            _ => Err(GenerationError::EmptyCompletion),
        };
    }

    Ok(texts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    #[test]
    fn test_extract_single_part() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "AI dreams in silicon\n"}]},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "AI dreams in silicon\n");
    }

    #[test]
    fn test_extract_concatenates_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "one "}, {"text": "two"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "one two");
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = extract_text(body).unwrap_err();
        assert!(matches!(err, GenerationError::Blocked(_)));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_candidate_without_text() {
        let body = r#"{"candidates": [{"finishReason": "RECITATION"}]}"#;
        assert!(matches!(
            extract_text(body),
            Err(GenerationError::Blocked(_))
        ));

        let body = r#"{"candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]}"#;
        assert!(matches!(
            extract_text(body),
            Err(GenerationError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_no_candidates() {
        assert!(matches!(
            extract_text("{}"),
            Err(GenerationError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            extract_text("<html>oops</html>"),
            Err(GenerationError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_status_error_uses_provider_message() {
        let body = concat!(
            r#"{"error": {"code": 400, "message": "API key not valid.", "#,
            r#""status": "INVALID_ARGUMENT"}}"#
        );
        let err = status_error(400, body);
        assert_eq!(err.to_string(), "completion API returned status 400: API key not valid.");
    }

    #[test]
    fn test_status_error_falls_back_to_body() {
        let err = status_error(502, "  Bad Gateway \n");
        assert!(matches!(
            err,
            GenerationError::Status { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ServiceConfig::new(ApiKey::new("k").unwrap());
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            concat!(
                "https://generativelanguage.googleapis.com",
                "/v1beta/models/gemini-1.5-flash:generateContent"
            )
        );
        assert_eq!(client.describe(), "gemini:gemini-1.5-flash");
    }

    #[test]
    fn test_invalid_model_rejected() {
        assert!(build_endpoint(DEFAULT_BASE, "models/evil").is_err());
        assert!(build_endpoint(DEFAULT_BASE, " ").is_err());
        assert!(build_endpoint("not a url", "gemini-1.5-flash").is_err());
    }

    const DEFAULT_BASE: &str = crate::config::DEFAULT_GEMINI_URL;
}

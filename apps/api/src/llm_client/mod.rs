//! LLM Client — structured-JSON calls to the Anthropic Messages API.
//!
//! Shared by candidate assessment and resume analysis. Both treat any error
//! as "AI path unavailable" and fall back to deterministic output, so this
//! client only has to fail fast and fail typed.
//!
//! Each attempt carries its own timeout (`LlmSettings::request_timeout`);
//! 429 and 5xx responses, transport errors and attempt timeouts are retried
//! with doubling backoff up to `LlmSettings::max_attempts`.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// The model behind every structured call.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Attempt budget for one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmSettings {
    /// Total attempts including the first; at least 1.
    pub max_attempts: u32,
    pub request_timeout: Duration,
}

impl LlmSettings {
    /// Delay before attempt `attempt` (0-based): 0, 500ms, 1s, 2s, ...
    fn backoff(attempt: u32) -> Duration {
        match attempt {
            0 => Duration::ZERO,
            n => BASE_BACKOFF.saturating_mul(2u32.saturating_pow(n - 1)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Outcome of one failed attempt.
#[derive(Debug)]
enum AttemptError {
    Retryable(LlmError),
    Fatal(LlmError),
}

/// Maps a non-success status and body to a retry decision.
fn classify_failure(status: StatusCode, body: String) -> AttemptError {
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    let error = LlmError::Api {
        status: status.as_u16(),
        message,
    };

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AttemptError::Retryable(error)
    } else {
        AttemptError::Fatal(error)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(api_key: String, settings: LlmSettings) -> Result<Self, LlmError> {
        let http = Client::builder()
            .connect_timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            http,
            api_key,
            settings: LlmSettings {
                max_attempts: settings.max_attempts.max(1),
                ..settings
            },
        })
    }

    /// Sends `prompt` and deserializes the model's text reply as `T`.
    /// The prompt must ask for JSON only; code fences are tolerated.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.send(prompt, system).await?;
        let text = response.first_text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(strip_json_fences(text))?)
    }

    async fn send(&self, prompt: &str, system: &str) -> Result<MessagesResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = LlmError::EmptyContent;
        let mut rate_limited = false;

        for attempt in 0..self.settings.max_attempts {
            let delay = LlmSettings::backoff(attempt);
            if !delay.is_zero() {
                warn!("LLM retry {attempt} in {}ms: {last_error}", delay.as_millis());
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&body).await {
                Ok(response) => {
                    debug!(
                        "LLM call ok after {} attempt(s): {} in / {} out tokens",
                        attempt + 1,
                        response.usage.input_tokens,
                        response.usage.output_tokens
                    );
                    return Ok(response);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) => {
                    rate_limited = matches!(e, LlmError::Api { status: 429, .. });
                    last_error = e;
                }
            }
        }

        if rate_limited {
            return Err(LlmError::RateLimited {
                retries: self.settings.max_attempts - 1,
            });
        }
        Err(last_error)
    }

    async fn attempt(&self, body: &MessagesRequest<'_>) -> Result<MessagesResponse, AttemptError> {
        let response = self
            .http
            .post(MESSAGES_URL)
            .timeout(self.settings.request_timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(LlmError::Http(e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, text));
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| AttemptError::Fatal(LlmError::Http(e)))
    }
}

/// Returns the JSON inside a ```json fenced block, or the trimmed input.
fn strip_json_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_is_unwrapped() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(
            strip_json_fences("\n  ```json\n{\"overallScore\": 70}\n```  \n"),
            "{\"overallScore\": 70}"
        );
    }

    #[test]
    fn test_bare_json_is_trimmed_only() {
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_unterminated_fence_still_yields_body() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_first_text_skips_other_blocks_and_blank_text() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "tool_use", "text": null},
                    {"type": "text", "text": "{}"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("{}"));

        let blank: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "  "}], "usage": {"input_tokens": 1, "output_tokens": 0}}"#,
        )
        .unwrap();
        assert_eq!(blank.first_text(), None);
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(LlmSettings::backoff(0), Duration::ZERO);
        assert_eq!(LlmSettings::backoff(1), Duration::from_millis(500));
        assert_eq!(LlmSettings::backoff(2), Duration::from_secs(1));
        assert_eq!(LlmSettings::backoff(3), Duration::from_secs(2));
    }

    #[test]
    fn test_rate_limits_and_server_errors_are_retried() {
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, String::new()),
            AttemptError::Retryable(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            AttemptError::Retryable(_)
        ));
    }

    #[test]
    fn test_client_errors_are_fatal_with_api_message() {
        let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#;
        match classify_failure(StatusCode::BAD_REQUEST, body.to_string()) {
            AttemptError::Fatal(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "max_tokens too large");
            }
            other => panic!("expected fatal API error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        let client = LlmClient::new(
            "key".to_string(),
            LlmSettings {
                max_attempts: 0,
                request_timeout: Duration::from_secs(1),
            },
        )
        .unwrap();
        assert_eq!(client.settings.max_attempts, 1);
    }
}

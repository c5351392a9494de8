//! OpenAI Chat Completions narrative backend.
//!
//! Sends the shared persona prompt as a single user message and returns the
//! first choice's content. Rate limits (429) and 5xx responses are retried
//! with exponential backoff; other 4xx responses fail immediately.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::narrative::{
    build_narrative_prompt, resolve_api_key, NarrativeError, NarrativeProvider,
};
use crate::utilities::config::OpenAiSettings;

pub const PROVIDER: &str = "OpenAI";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI-backed narrator.
#[derive(Debug, Clone)]
pub struct OpenAiNarrator {
    model: String,
    api_key: String,
    base_url: String,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for 429/5xx/transport failures.
    pub max_retries: u32,
}

impl OpenAiNarrator {
    /// Create a narrator. The key comes from `api_key` or `OPENAI_API_KEY`.
    pub fn new(api_key: Option<String>, settings: &OpenAiSettings) -> Result<Self, NarrativeError> {
        let api_key = resolve_api_key(api_key, API_KEY_ENV, PROVIDER)?;
        Ok(Self {
            model: settings.model.clone(),
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
            max_retries: 2,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Request body for one prompt.
    pub fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
        })
    }

    /// Extract the first choice's message content.
    fn parse_completions_response(response: &Value) -> Result<String, NarrativeError> {
        let malformed = |detail: &str| NarrativeError::MalformedResponse {
            provider: PROVIDER,
            detail: detail.to_string(),
        };

        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| malformed("no choices in response"))?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "OpenAI token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("completion_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("total_tokens").and_then(Value::as_i64).unwrap_or(0),
            );
        }

        message
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| malformed("choice has no text content"))
    }

    /// Pull the `error.message` out of an OpenAI error body, if present.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl NarrativeProvider for OpenAiNarrator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, username: &str, corpus: &str) -> Result<String, NarrativeError> {
        let body = self.build_request_body(&build_narrative_prompt(username, corpus));
        let endpoint = self.endpoint();
        log::debug!("OpenAI narrative request: model={}, endpoint={}", self.model, endpoint);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| NarrativeError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let mut last_error: Option<NarrativeError> = None;
        let mut retry_delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                log::warn!("OpenAI API retry attempt {} after {:?}", attempt, retry_delay);
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let response = match client
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(source) => {
                    last_error = Some(NarrativeError::Transport {
                        provider: PROVIDER,
                        source,
                    });
                    continue;
                }
            };

            let status = response.status();
            let text = response.text().await.map_err(|source| NarrativeError::Transport {
                provider: PROVIDER,
                source,
            })?;

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(NarrativeError::Service {
                    provider: PROVIDER,
                    status: Some(status.as_u16()),
                    message: Self::error_message(&text),
                });
                continue;
            }

            if !status.is_success() {
                return Err(NarrativeError::Service {
                    provider: PROVIDER,
                    status: Some(status.as_u16()),
                    message: Self::error_message(&text),
                });
            }

            let json: Value =
                serde_json::from_str(&text).map_err(|e| NarrativeError::MalformedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;
            return Self::parse_completions_response(&json);
        }

        Err(last_error.unwrap_or(NarrativeError::Service {
            provider: PROVIDER,
            status: None,
            message: "call failed after all retries".to_string(),
        }))
    }
}

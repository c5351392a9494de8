//! Hugging Face Inference API narrative backend.
//!
//! Posts `{"inputs": prompt, "parameters": {"max_new_tokens": N}}` to
//! `<base>/models/<model>`. The API's answer shapes vary by model, so
//! decoding is lenient: a `generated_text` list is the happy path, an
//! `error` object is a service failure, and anything else is returned as
//! its JSON text.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::narrative::{
    build_narrative_prompt, resolve_api_key, NarrativeError, NarrativeProvider,
};
use crate::utilities::config::HuggingFaceSettings;

pub const PROVIDER: &str = "Hugging Face";
pub const API_KEY_ENV: &str = "HF_API_KEY";

/// Hugging Face-backed narrator.
#[derive(Debug, Clone)]
pub struct HuggingFaceNarrator {
    model: String,
    api_key: String,
    base_url: String,
    pub max_new_tokens: u32,
    pub timeout: Duration,
}

impl HuggingFaceNarrator {
    /// Create a narrator. The key comes from `api_key` or `HF_API_KEY`.
    pub fn new(
        api_key: Option<String>,
        settings: &HuggingFaceSettings,
    ) -> Result<Self, NarrativeError> {
        let api_key = resolve_api_key(api_key, API_KEY_ENV, PROVIDER)?;
        Ok(Self {
            model: settings.model.clone(),
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_new_tokens: settings.max_new_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    pub fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": { "max_new_tokens": self.max_new_tokens },
        })
    }

    /// Interpret a 200 response body.
    fn decode_response(result: &Value) -> Result<String, NarrativeError> {
        if let Some(error) = result.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(NarrativeError::Service {
                provider: PROVIDER,
                status: None,
                message,
            });
        }

        if let Some(text) = result
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(Value::as_str)
        {
            return Ok(text.to_string());
        }

        log::debug!("Hugging Face response had no generated_text, returning raw JSON");
        Ok(result.to_string())
    }
}

#[async_trait]
impl NarrativeProvider for HuggingFaceNarrator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, username: &str, corpus: &str) -> Result<String, NarrativeError> {
        let transport = |source| NarrativeError::Transport {
            provider: PROVIDER,
            source,
        };

        let body = self.build_request_body(&build_narrative_prompt(username, corpus));
        let endpoint = self.endpoint();
        log::debug!("Hugging Face narrative request: endpoint={}", endpoint);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(transport)?;
        let response = client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if status != reqwest::StatusCode::OK {
            return Err(NarrativeError::Service {
                provider: PROVIDER,
                status: Some(status.as_u16()),
                message: text,
            });
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| NarrativeError::MalformedResponse {
                provider: PROVIDER,
                detail: e.to_string(),
            })?;
        Self::decode_response(&json)
    }
}

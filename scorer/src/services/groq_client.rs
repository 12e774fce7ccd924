//! Groq chat-completions client

use std::time::Instant;

use async_trait::async_trait;
use shared::ApiFailure;

use crate::config::ScorerConfig;
use crate::error::{ScorerError, ScorerResult};
use crate::traits::ScoringClient;
use crate::types::{ChatPrompt, ProviderResponse};

/// Characters of an error body kept in a `ServerError`
const ERROR_BODY_PREVIEW: usize = 200;

/// OpenAI-compatible client for the Groq API
pub struct RealScoringClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl RealScoringClient {
    pub fn new(config: &ScorerConfig) -> ScorerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ScorerError::HttpClientError { message: e.to_string() })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ScoringClient for RealScoringClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<ProviderResponse, ApiFailure> {
        let request_start = Instant::now();

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "temperature": prompt.temperature,
            "max_tokens": prompt.max_tokens
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiFailure::Timeout
                } else {
                    ApiFailure::NetworkError(e.to_string())
                }
            })?;

        let response_time = request_start.elapsed();
        let status = response.status();

        if !status.is_success() {
            return match status.as_u16() {
                401 => Err(ApiFailure::AuthenticationFailed),
                429 => Err(ApiFailure::RateLimitExceeded),
                503 => Err(ApiFailure::ServiceUnavailable),
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
                    Err(ApiFailure::ServerError(format!("{status}: {preview}")))
                }
            };
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiFailure::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| ApiFailure::InvalidResponse("No content in response".to_string()))?;

        let usage = response_json.get("usage");
        let usage_field = |field: &str| {
            usage
                .and_then(|u| u.get(field))
                .and_then(|t| t.as_u64())
                .unwrap_or(0) as u32
        };

        Ok(ProviderResponse {
            content: content.to_string(),
            tokens_used: usage_field("total_tokens"),
            prompt_tokens: usage_field("prompt_tokens"),
            completion_tokens: usage_field("completion_tokens"),
            model_used: response_json
                .get("model")
                .and_then(|m| m.as_str())
                .unwrap_or(&self.model)
                .to_string(),
            response_time,
        })
    }
}

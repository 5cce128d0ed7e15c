use super::{GenerationParams, LLMError, LLMProvider, Message};
use crate::config::OpenAIConfig;
use crate::secrets::{scrub_secrets, SecretString};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound for one chat completion request
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Upper bound for the model-list health probe
const HEALTH_TIMEOUT_SECS: u64 = 10;

pub struct OpenAIProvider {
    config: OpenAIConfig,
    api_key: SecretString,
    client: reqwest::Client,
    request_timeout: Duration,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig, api_key: SecretString) -> Self {
        Self {
            config,
            api_key,
            client: reqwest::Client::new(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Sampling parameters for interview turns
    pub fn conversation_params(&self) -> GenerationParams {
        GenerationParams::new(self.config.temperature, self.config.max_tokens)
    }

    async fn send(&self, messages: &[Message], params: GenerationParams) -> super::Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let api_messages: Vec<_> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content
                })
            })
            .collect();

        let payload = json!({
            "model": self.config.model,
            "messages": api_messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(scrub_secrets(&e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = scrub_secrets(&response.text().await.unwrap_or_default());

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed(text),
                429 => LLMError::RateLimitExceeded,
                500..=599 => LLMError::ProviderUnavailable(format!("{}: {}", status, text)),
                _ => LLMError::InvalidRequest(text),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

        choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| LLMError::ParseError("Empty content".to_string()))
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    /// Lists models with the configured key; any non-2xx or transport
    /// failure counts as unhealthy
    async fn check_health(&self) -> bool {
        if self.api_key.is_empty() {
            return false;
        }

        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send();

        match request.await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "OpenAI health check rejected");
                false
            }
            Err(e) => {
                tracing::warn!("OpenAI health check failed: {}", scrub_secrets(&e.to_string()));
                false
            }
        }
    }

    async fn generate(&self, messages: &[Message], params: GenerationParams) -> super::Result<String> {
        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            temperature = params.temperature,
            "Requesting chat completion"
        );

        match timeout(self.request_timeout, self.send(messages, params)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Chat completion timed out after {}s",
                    self.request_timeout.as_secs()
                );
                Err(LLMError::Timeout)
            }
        }
    }
}

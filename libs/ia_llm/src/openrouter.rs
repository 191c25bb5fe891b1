use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use crate::{ChatMessage, LLMService, LlmError, ModelCandidate, Result};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub referer: String,
    pub title: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: "http://localhost:5173".to_string(),
            title: "IA Proxy".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct OpenRouterService {
    client: Client,
    endpoint: String,
    config: OpenRouterConfig,
}

impl OpenRouterService {
    pub fn new(config: OpenRouterConfig) -> Self {
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Self {
            client: Client::new(),
            endpoint,
            config,
        }
    }

    async fn send(&self, messages: &[ChatMessage], model: &ModelCandidate) -> Result<String> {
        let request = ChatCompletionRequest {
            model: model.as_str(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let transport_error = |e: reqwest::Error| LlmError::Transport {
            model: model.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(status, response.text().await);
            return Err(LlmError::Status {
                model: model.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(transport_error)?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse {
                model: model.to_string(),
            });
        }

        Ok(content.to_string())
    }
}

fn error_body<E: std::fmt::Display>(
    status: StatusCode,
    raw: std::result::Result<String, E>,
) -> String {
    let reason = status.canonical_reason().unwrap_or_default();
    match raw {
        Ok(raw) => match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(envelope) => envelope.error.message,
            Err(_) if raw.trim().is_empty() => reason.to_string(),
            Err(_) => raw,
        },
        Err(e) => {
            tracing::warn!(status = status.as_u16(), "Failed to read upstream error body: {}", e);
            format!("{} (unreadable body: {})", reason, e)
        }
    }
}

#[async_trait]
impl LLMService for OpenRouterService {
    async fn call_model(
        &self,
        messages: &[ChatMessage],
        model: &ModelCandidate,
        limit: Duration,
    ) -> Result<String> {
        tracing::debug!(model = %model, messages = messages.len(), "Calling upstream model");

        // Dropping the in-flight future on expiry aborts the HTTP request.
        match timeout(limit, self.send(messages, model)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                model: model.to_string(),
                timeout: limit,
            }),
        }
    }
}

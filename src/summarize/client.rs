//! OpenAI-compatible chat completion client over plain HTTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Calls `POST {api_base}/chat/completions` with a bearer credential.
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(api_base: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let endpoint = format!("{}/chat/completions", api_base.trim_end_matches('/'));
        info!(
            "Initialized chat completion client with endpoint: {} (timeout {}s)",
            endpoint,
            timeout.as_secs_f32()
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builder failures happen before anything leaves the process; the rest are transport failures.
    fn send_error(e: reqwest::Error) -> CompletionError {
        if e.is_builder() {
            CompletionError::Request(e.to_string())
        } else {
            CompletionError::Network(e.to_string())
        }
    }

    fn extract_content(response: CompletionResponse) -> Result<String, CompletionError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse("No completion choices returned".to_string())
            })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            "Sending chat completion request with model {} ({} messages)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(Self::send_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if !status.is_success() {
            error!(
                "Chat completion request failed with status {}: {}",
                status, response_text
            );
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let completion: CompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            CompletionError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        Self::extract_content(completion)
    }
}

//! Transcript summarization through an upstream chat completion service.
//!
//! One request in, at most one upstream call out. Nothing is retried.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{mask_secret, UpstreamConfig, API_KEY_ENV};

pub mod client;
pub mod prompt;

pub use client::ChatCompletionClient;

/// Sampling temperature sent with every summary request.
pub const TEMPERATURE: f32 = 0.7;
/// Upper bound on generated tokens per summary.
pub const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Wire body for a chat completion call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Failures reported by a [`CompletionClient`].
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Network(String),

    /// The outgoing request could not be built.
    #[error("Failed to build completion request: {0}")]
    Request(String),

    #[error("{0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Transcript is required")]
    MissingTranscript,

    #[error("AI service is not available")]
    NotConfigured,

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Anything that can turn a chat conversation into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// Request body for `POST /api/summarize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeRequest {
    pub transcript: String,
    pub custom_instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub success: bool,
}

pub struct Summarizer {
    client: Option<Arc<dyn CompletionClient>>,
    model: String,
}

impl Summarizer {
    /// `client` is `None` when no credential is configured; summarization is then refused.
    pub fn new(client: Option<Arc<dyn CompletionClient>>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let client: Option<Arc<dyn CompletionClient>> = match config.credential() {
            Some(key) => {
                info!("Upstream API key configured: {}", mask_secret(key));
                Some(Arc::new(ChatCompletionClient::new(
                    &config.api_base,
                    key,
                    config.timeout(),
                )?))
            }
            None => {
                warn!(
                    "{} not configured, summarization is disabled",
                    API_KEY_ENV
                );
                None
            }
        };

        Ok(Self::new(client, config.model.clone()))
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn build_request(&self, request: &SummarizeRequest) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: prompt::build_messages(&request.custom_instruction, &request.transcript),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<String, SummarizeError> {
        if request.transcript.trim().is_empty() {
            return Err(SummarizeError::MissingTranscript);
        }

        let client = self.client.as_ref().ok_or(SummarizeError::NotConfigured)?;

        info!(
            "Summarizing transcript ({} chars) with {} via {}",
            request.transcript.chars().count(),
            self.model,
            client.name()
        );

        match client.complete(&self.build_request(request)).await {
            Ok(summary) => {
                info!("Summary generated: {} chars", summary.chars().count());
                Ok(summary)
            }
            Err(e) => {
                error!("Summarization failed: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeClient {
        reply: Result<String, CompletionError>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl FakeClient {
        fn replying(reply: Result<String, CompletionError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.reply.clone()
        }
    }

    fn model() -> String {
        UpstreamConfig::default().model
    }

    fn request(transcript: &str, instruction: &str) -> SummarizeRequest {
        SummarizeRequest {
            transcript: transcript.to_string(),
            custom_instruction: instruction.to_string(),
        }
    }

    #[tokio::test]
    async fn test_summarize_returns_completion_verbatim() {
        let fake = FakeClient::replying(Ok("  - Decision: ship Friday\n".to_string()));
        let summarizer = Summarizer::new(Some(fake.clone()), model());

        let summary = summarizer
            .summarize(&request("Alice: ship it Friday", "Bullets"))
            .await
            .unwrap();

        assert_eq!(summary, "  - Decision: ship Friday\n");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_summarize_sends_fixed_parameters() {
        let fake = FakeClient::replying(Ok("ok".to_string()));
        let summarizer = Summarizer::new(Some(fake.clone()), model());

        summarizer.summarize(&request("Bob: hello", "")).await.unwrap();

        let sent = fake.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.model, "llama3-8b-8192");
        assert_eq!(sent.temperature, 0.7);
        assert_eq!(sent.max_tokens, 2000);
        assert_eq!(sent.messages[0].content, prompt::SYSTEM_PROMPT);
        assert!(sent.messages[1].content.contains("Bob: hello"));
    }

    #[tokio::test]
    async fn test_non_ascii_transcript_is_forwarded_unchanged() {
        let transcript = "Zoë: Müller stimmt zu 👍";
        assert_ne!(transcript.len(), transcript.chars().count());

        let fake = FakeClient::replying(Ok("Einigung ✅".to_string()));
        let summarizer = Summarizer::new(Some(fake.clone()), model());

        let summary = summarizer
            .summarize(&request(transcript, ""))
            .await
            .unwrap();

        assert_eq!(summary, "Einigung ✅");
        let sent = fake.last_request.lock().unwrap().clone().unwrap();
        assert!(sent.messages[1].content.contains(transcript));
    }

    #[tokio::test]
    async fn test_blank_transcript_skips_upstream() {
        let fake = FakeClient::replying(Ok("unused".to_string()));
        let summarizer = Summarizer::new(Some(fake.clone()), model());

        for transcript in ["", "   \n\t"] {
            let err = summarizer
                .summarize(&request(transcript, "Bullets"))
                .await
                .unwrap_err();
            assert!(matches!(err, SummarizeError::MissingTranscript));
            assert_eq!(err.to_string(), "Transcript is required");
        }
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_client_is_configuration_error() {
        let summarizer = Summarizer::new(None, model());
        assert!(!summarizer.is_available());

        let err = summarizer
            .summarize(&request("Carol: hi", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizeError::NotConfigured));
        assert_eq!(err.to_string(), "AI service is not available");
    }

    #[tokio::test]
    async fn test_validation_precedes_configuration_check() {
        let summarizer = Summarizer::new(None, model());
        let err = summarizer.summarize(&request("", "")).await.unwrap_err();
        assert!(matches!(err, SummarizeError::MissingTranscript));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_mapped() {
        let fake = FakeClient::replying(Err(CompletionError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        }));
        let summarizer = Summarizer::new(Some(fake), model());

        let err = summarizer
            .summarize(&request("Dan: hi", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SummarizeError::Completion(CompletionError::Upstream { status: 503, .. })
        ));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_from_config_without_key_is_unavailable() {
        let summarizer = Summarizer::from_config(&UpstreamConfig::default()).unwrap();
        assert!(!summarizer.is_available());
    }

    #[test]
    fn test_from_config_with_key_is_available() {
        let config = UpstreamConfig {
            api_key: Some("gsk_test".to_string()),
            ..UpstreamConfig::default()
        };
        let summarizer = Summarizer::from_config(&config).unwrap();
        assert!(summarizer.is_available());
    }

    #[test]
    fn test_request_fields_default_to_empty() {
        let parsed: SummarizeRequest = serde_json::from_str(r#"{"transcript":"x"}"#).unwrap();
        assert_eq!(parsed.custom_instruction, "");

        let parsed: SummarizeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.transcript, "");
    }
}

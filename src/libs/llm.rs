//! Language model access.
//!
//! Analysis code depends on the [`Analyzer`] trait only. The real
//! implementation talks to an OpenAI-compatible chat completions endpoint
//! (OpenRouter or DeepSeek); [`MockAnalyzer`] returns a fixed answer so the
//! whole pipeline works without an API key.

use crate::libs::config::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a helpful data analyst for EEG/BCI metrics. Answer in strict JSON only.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Turns a prompt into the model's raw text answer.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for OpenAI-compatible chat completions endpoints.
pub struct ChatCompletionsClient {
    client: Client,
    config: LlmConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout)).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Analyzer for ChatCompletionsClient {
    async fn analyze(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.provider.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!(provider = %self.config.provider, model = %self.config.model, chars = content.len(), "analysis received");
        Ok(content)
    }
}

/// Deterministic answer used when no API key is configured.
#[derive(Debug, Default, Clone)]
pub struct MockAnalyzer;

impl MockAnalyzer {
    pub fn response() -> serde_json::Value {
        json!({
            "productivity_periods": [
                {"start_time": "10:00", "end_time": "11:30", "recommended_activity": "Deep work: complex tasks"},
                {"start_time": "14:30", "end_time": "15:00", "recommended_activity": "Light tasks / admin"}
            ],
            "day_plan": "10:00-11:30 deep work; 12:30-13:00 lunch; 14:30-15:00 light tasks; sleep before 23:00",
            "improvement_suggestions": [
                "Do 5-min breathing every hour in the morning",
                "Schedule hardest tasks at 10:00",
                "10-min walk after lunch"
            ]
        })
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(Self::response().to_string())
    }
}

/// Real client when settings are present, the mock otherwise.
pub fn analyzer_for(settings: Option<LlmConfig>) -> Result<Arc<dyn Analyzer>, LlmError> {
    match settings {
        Some(config) => Ok(Arc::new(ChatCompletionsClient::new(config)?)),
        None => Ok(Arc::new(MockAnalyzer)),
    }
}

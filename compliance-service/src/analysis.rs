//! Text-analysis capability
//!
//! The evaluator only sees [`TextAnalyzer`]; [`OpenAiAnalyzer`] talks to any
//! OpenAI-compatible chat-completions endpoint.

use crate::error::AnalysisError;
use crate::metrics::ANALYSIS_REQUEST_DURATION;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default chat-completions API base
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// One request to the analysis service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Language-analysis service
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    /// Submit one request and return the raw text answer
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError>;

    fn name(&self) -> &str;
}

/// Chat-completions client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 120,
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat-completions analyzer. The inner client is pooled and safe to share
/// across concurrent ruleset evaluations.
pub struct OpenAiAnalyzer {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiAnalyzer {
    pub fn new(config: OpenAiConfig) -> Result<Self, AnalysisError> {
        if config.api_key.is_empty() {
            return Err(AnalysisError::Unavailable("no API key configured".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextAnalyzer for OpenAiAnalyzer {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
        });

        let start = Instant::now();
        let result = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await;
        ANALYSIS_REQUEST_DURATION
            .with_label_values(&[self.config.model.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Analysis service returned {}: {}", status, message);

            return Err(AnalysisError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AnalysisError::MalformedResponse("response has no message content".to_string()))?;

        debug!("Analysis returned {} bytes", content.len());
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

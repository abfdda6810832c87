//! Groq chat-completions client
//!
//! Speaks the OpenAI-compatible protocol:
//! ```text
//! POST {base_url}/chat/completions
//! Authorization: Bearer $GROQ_API_KEY
//! ```
//!
//! One request per step, no streaming, no retry.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{LlmError, LlmGateway};
use crate::config::{LlmConfig, API_KEY_ENV};

/// HTTP client for the Groq completion API
pub(crate) struct GroqClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
}

impl GroqClient {
    /// Builds a client, failing if no API key is configured.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey { var: API_KEY_ENV })?;

        Ok(Self {
            client: Client::new(),
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl LlmGateway for GroqClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        info!("Requesting next command from {}", self.config.model);
        debug!("POST {} ({} byte prompt)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| LlmError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(e.to_string()))?;

        Ok(parse_completion(&body)?)
    }
}

/// Extracts the first choice's content, trimmed.
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::parse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    Ok(choice
        .message
        .content
        .unwrap_or_default()
        .trim()
        .to_string())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
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

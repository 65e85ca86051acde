// src/services/llm.rs
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_TOKENS: u32 = 1024;

/// Which model answers the advice request. Chosen per request from the
/// `provider`/`model` query parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmProvider {
    Anthropic { model: String },
    OpenAI { model: String },
}

impl LlmProvider {
    /// Parse the request parameters; provider defaults to Anthropic, the
    /// model to a per-provider default.
    pub fn from_request(provider: Option<&str>, model: Option<&str>) -> Result<Self> {
        match provider.unwrap_or("anthropic").to_ascii_lowercase().as_str() {
            "anthropic" => Ok(LlmProvider::Anthropic {
                model: model.unwrap_or(DEFAULT_ANTHROPIC_MODEL).to_string(),
            }),
            "openai" => Ok(LlmProvider::OpenAI {
                model: model.unwrap_or(DEFAULT_OPENAI_MODEL).to_string(),
            }),
            other => bail!("unknown LLM provider '{}'", other),
        }
    }
}

/// Turns a finished prompt into free-text advice. Production calls a hosted
/// model; tests substitute a canned answer.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn complete(&self, provider: &LlmProvider, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

pub struct LlmClient {
    http: Client,
    anthropic_key: Option<String>,
    openai_key: Option<String>,
}

impl LlmClient {
    pub fn new(anthropic_key: Option<String>, openai_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(LlmClient {
            http,
            anthropic_key,
            openai_key,
        })
    }

    async fn complete_anthropic(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .anthropic_key
            .as_deref()
            .context("ANTHROPIC_API_KEY is not configured")?;
        debug!("Sending advice prompt to Anthropic model {}", model);

        let request = AnthropicRequest {
            model: model.to_string(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        let response = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("Anthropic API error {}: {}", status, error_text);
        }

        let data: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        data.content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from Anthropic"))
    }

    async fn complete_openai(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .openai_key
            .as_deref()
            .context("OPENAI_API_KEY is not configured")?;
        debug!("Sending advice prompt to OpenAI model {}", model);

        let request = OpenAIRequest {
            model: model.to_string(),
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.3,
        };

        let response = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, error_text);
        }

        let data: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        data.choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from OpenAI"))
    }
}

#[async_trait]
impl Advisor for LlmClient {
    async fn complete(&self, provider: &LlmProvider, prompt: &str) -> Result<String> {
        match provider {
            LlmProvider::Anthropic { model } => self.complete_anthropic(model, prompt).await,
            LlmProvider::OpenAI { model } => self.complete_openai(model, prompt).await,
        }
    }
}

//! Anthropic Claude API provider implementation.

use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

use super::prompts;
use super::provider::{api_key_from_env, JsonEndpoint, LlmConfig, LlmProvider};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Claude provider.
pub struct AnthropicProvider {
    endpoint: JsonEndpoint,
    config: LlmConfig,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default().with_model(DEFAULT_MODEL))
    }

    /// Create a new Anthropic provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let endpoint = JsonEndpoint::new(
            "Anthropic",
            HeaderName::from_static("x-api-key"),
            &api_key.into(),
        )?
        .with_header("anthropic-version", API_VERSION);
        Ok(Self { endpoint, config })
    }

    /// Create from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env("ANTHROPIC_API_KEY")?)
    }

    fn request<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: prompts::system_prompt(),
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl LlmProvider for AnthropicProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        let response: MessagesResponse = self.endpoint.post(API_URL, &self.request(prompt))?;
        response.text()
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    temperature: f64,
    system: &'static str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Text blocks joined in order; other block kinds are skipped.
    fn text(self) -> Result<String> {
        let text: String = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(RosterError::Provider("No text in Anthropic response".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

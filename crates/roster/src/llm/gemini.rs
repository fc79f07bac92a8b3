//! Google Gemini API provider implementation.

use reqwest::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

use super::prompts;
use super::provider::{api_key_from_env, JsonEndpoint, LlmConfig, LlmProvider};

/// Gemini API base; the model and method are appended per request.
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini provider.
pub struct GeminiProvider {
    endpoint: JsonEndpoint,
    config: LlmConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let endpoint = JsonEndpoint::new(
            "Gemini",
            HeaderName::from_static("x-goog-api-key"),
            &api_key.into(),
        )?;
        Ok(Self { endpoint, config })
    }

    /// Create from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env("GEMINI_API_KEY")?)
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.config.model)
    }

    fn request<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            system_instruction: Content::text(None, prompts::system_prompt()),
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        let response: GenerateContentResponse =
            self.endpoint.post(&self.url(), &self.request(prompt))?;
        response.text()
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'static str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![TextPart { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

/// Gemini generateContent response.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Result<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| RosterError::Provider("No candidates in Gemini response".to_string()))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.is_empty() {
            return Err(RosterError::Provider("No text in Gemini response".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "[{\"rowIndex\""}, {"text": ":0}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().unwrap(), "[{\"rowIndex\":0}]");
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(matches!(response.text(), Err(RosterError::Provider(_))));
    }

    #[test]
    fn test_url_uses_model() {
        let provider =
            GeminiProvider::with_config("key", LlmConfig::default().with_model("gemini-2.0-flash"))
                .unwrap();
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let provider = GeminiProvider::new("key").unwrap();
        let body = serde_json::to_value(provider.request("check these rows")).unwrap();

        assert_eq!(
            body["contents"],
            json!([{"role": "user", "parts": [{"text": "check these rows"}]}])
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }
}

//! LLM provider trait and configuration.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, RosterError};

/// Per-request timeout for hosted providers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

impl LlmConfig {
    /// Same configuration with a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// A text-generation service.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can
/// serve every gateway. Calls block; async callers run them on the blocking
/// pool.
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw text of the answer.
    ///
    /// The answer is free-form. Callers are responsible for extracting any
    /// structure they asked for.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Read an API key from the environment.
pub fn api_key_from_env(var: &str) -> Result<String> {
    std::env::var(var)
        .map_err(|_| RosterError::Config(format!("{} environment variable not set", var)))
}

/// Blocking JSON endpoint of a hosted model.
///
/// Holds the client and the auth headers so providers only describe their
/// request and response bodies.
pub(crate) struct JsonEndpoint {
    client: Client,
    headers: HeaderMap,
    service: &'static str,
}

impl JsonEndpoint {
    /// Build an endpoint that sends `key_header: api_key` with every call.
    pub(crate) fn new(service: &'static str, key_header: HeaderName, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RosterError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| RosterError::Config(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(key_header, key);

        Ok(Self {
            client,
            headers,
            service,
        })
    }

    /// Add a fixed header, e.g. an API version pin.
    pub(crate) fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    /// POST `body` to `url` and decode the reply.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all
    /// surface as [`RosterError::Provider`]. There are no retries.
    pub(crate) fn post<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .map_err(|e| RosterError::Provider(format!("{} request failed: {}", self.service, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            tracing::debug!(service = self.service, %status, "provider returned an error status");
            return Err(RosterError::Provider(format!(
                "{} API error ({}): {}",
                self.service, status, detail
            )));
        }

        response.json().map_err(|e| {
            RosterError::Provider(format!("Failed to parse {} response: {}", self.service, e))
        })
    }

    #[cfg(test)]
    pub(crate) fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

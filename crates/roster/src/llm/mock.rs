//! Mock LLM provider for testing and offline runs.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, RosterError};

use super::provider::{LlmConfig, LlmProvider};

/// Reply used when nothing is scripted: a clean validation result.
const DEFAULT_REPLY: &str = "[]";

/// Mock LLM provider that replays scripted answers.
///
/// Scripted replies are returned in order; once they run out every call gets
/// the fallback reply. Every prompt received is recorded for assertions.
pub struct MockProvider {
    config: LlmConfig,
    script: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a mock that answers every prompt with `[]`.
    pub fn new() -> Self {
        Self::with_fallback(DEFAULT_REPLY)
    }

    /// Create a mock that answers every unscripted prompt with `reply`.
    pub fn with_fallback(reply: impl Into<String>) -> Self {
        Self {
            config: LlmConfig::default().with_model("mock"),
            script: Mutex::new(VecDeque::new()),
            fallback: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply for the next unanswered prompt.
    pub fn push_reply(&self, reply: impl Into<String>) -> &Self {
        lock(&self.script).push_back(Ok(reply.into()));
        self
    }

    /// Queue a provider failure for the next unanswered prompt.
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        lock(&self.script)
            .push_back(Err(RosterError::Provider(message.into())));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, prompt: &str) -> Result<String> {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_fallback() {
        let provider = MockProvider::new();
        provider.push_reply("first").push_failure("down");

        assert_eq!(provider.complete("a").unwrap(), "first");
        assert!(matches!(provider.complete("b"), Err(RosterError::Provider(_))));
        assert_eq!(provider.complete("c").unwrap(), "[]");

        assert_eq!(provider.prompts(), vec!["a", "b", "c"]);
        assert_eq!(provider.call_count(), 3);
    }

    #[test]
    fn test_custom_fallback() {
        let provider = MockProvider::with_fallback("{\"type\":\"coRun\",\"tasks\":[\"T1\",\"T2\"]}");
        assert!(provider.complete("anything").unwrap().contains("coRun"));
        assert_eq!(provider.name(), "mock");
    }
}

//! LLM provider integration.
//!
//! Both gateways delegate the language work to a text-generation service
//! behind the [`LlmProvider`] trait. Providers only move text; extracting
//! structure from the answer is the gateways' job.
//!
//! # Supported Providers
//!
//! - **Gemini** - Google models via API (requires `GEMINI_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - Scripted replies for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use roster::{GeminiProvider, ValidationGateway};
//!
//! let provider = Arc::new(GeminiProvider::from_env().unwrap());
//! let gateway = ValidationGateway::new(provider);
//! ```

mod anthropic;
mod gemini;
mod mock;
pub mod prompts;
mod provider;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use provider::{api_key_from_env, LlmConfig, LlmProvider};

//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use roster::{
    AnthropicProvider, Dataset, GeminiProvider, LlmConfig, LlmProvider, MockProvider,
    api_key_from_env,
};

/// Roster: LLM-assisted intake for client, worker and task datasets
#[derive(Parser)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API for editing, validating and exporting datasets
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// LLM provider used by both gateways
        #[arg(long, default_value = "gemini")]
        llm: LlmProviderChoice,

        /// Model to use (provider-specific, e.g., "gpt-4o", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Quiet period before an edited dataset is validated
        #[arg(long, default_value = "500")]
        debounce_ms: u64,

        /// Clients file to load at startup
        #[arg(long, value_name = "FILE")]
        clients: Option<PathBuf>,

        /// Workers file to load at startup
        #[arg(long, value_name = "FILE")]
        workers: Option<PathBuf>,

        /// Tasks file to load at startup
        #[arg(long, value_name = "FILE")]
        tasks: Option<PathBuf>,
    },

    /// Validate one data file and print the reported errors
    Validate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Which dataset the file holds (clients, workers, tasks)
        #[arg(short = 't', long = "type")]
        dataset: Dataset,

        /// LLM provider to use
        #[arg(long, default_value = "gemini")]
        llm: LlmProviderChoice,

        /// Model to use (provider-specific)
        #[arg(long)]
        model: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn a plain-English sentence into a scheduling rule
    Rule {
        /// Rule description, e.g. "Limit Backend group to 3 tasks per phase"
        #[arg(value_name = "SENTENCE")]
        sentence: String,

        /// Priority attached to the generated rule
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        priority: i64,

        /// LLM provider to use
        #[arg(long, default_value = "gemini")]
        llm: LlmProviderChoice,

        /// Model to use (provider-specific)
        #[arg(long)]
        model: Option<String>,
    },
}

/// LLM provider choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmProviderChoice {
    /// Google Gemini API (requires GEMINI_API_KEY)
    #[default]
    Gemini,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Mock provider: every validation passes, rules cannot be generated
    Mock,
}

impl LlmProviderChoice {
    /// Build the provider, reading credentials from the environment.
    pub fn build(self, model: Option<&str>) -> roster::Result<Arc<dyn LlmProvider>> {
        let provider: Arc<dyn LlmProvider> = match (self, model) {
            (LlmProviderChoice::Gemini, None) => Arc::new(GeminiProvider::from_env()?),
            (LlmProviderChoice::Gemini, Some(m)) => Arc::new(GeminiProvider::with_config(
                api_key_from_env("GEMINI_API_KEY")?,
                LlmConfig::default().with_model(m),
            )?),
            (LlmProviderChoice::Anthropic, None) => Arc::new(AnthropicProvider::from_env()?),
            (LlmProviderChoice::Anthropic, Some(m)) => Arc::new(AnthropicProvider::with_config(
                api_key_from_env("ANTHROPIC_API_KEY")?,
                LlmConfig::default().with_model(m),
            )?),
            (LlmProviderChoice::Mock, _) => Arc::new(MockProvider::new()),
        };
        tracing::debug!(provider = provider.name(), model = %provider.config().model, "provider ready");
        Ok(provider)
    }
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProviderChoice::Gemini),
            "anthropic" | "claude" => Ok(LlmProviderChoice::Anthropic),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: gemini, anthropic, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::Gemini => write!(f, "gemini"),
            LlmProviderChoice::Anthropic => write!(f, "anthropic"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["roster", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                port,
                llm,
                debounce_ms,
                clients,
                ..
            } => {
                assert_eq!(port, 3141);
                assert_eq!(llm, LlmProviderChoice::Gemini);
                assert_eq!(debounce_ms, 500);
                assert!(clients.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_validate_parses_dataset() {
        let cli =
            Cli::try_parse_from(["roster", "validate", "w.csv", "--type", "Workers", "--llm", "mock"])
                .unwrap();
        match cli.command {
            Commands::Validate { dataset, llm, .. } => {
                assert_eq!(dataset, Dataset::Workers);
                assert_eq!(llm, LlmProviderChoice::Mock);
            }
            _ => panic!("expected validate"),
        }
        assert!(Cli::try_parse_from(["roster", "validate", "x.csv", "--type", "jobs"]).is_err());
    }

    #[test]
    fn test_provider_aliases() {
        assert_eq!("Claude".parse::<LlmProviderChoice>(), Ok(LlmProviderChoice::Anthropic));
        assert_eq!("google".parse::<LlmProviderChoice>(), Ok(LlmProviderChoice::Gemini));
        assert!("openai".parse::<LlmProviderChoice>().is_err());
    }

    #[test]
    fn test_mock_provider_needs_no_credentials() {
        let provider = LlmProviderChoice::Mock.build(None).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}

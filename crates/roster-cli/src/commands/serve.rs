//! Serve command - start the HTTP API.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use roster::{Dataset, GridConfig, Session};

use crate::cli::LlmProviderChoice;
use crate::server::{app, state::AppState};

/// Files to load before the server starts.
pub struct Preload {
    pub clients: Option<PathBuf>,
    pub workers: Option<PathBuf>,
    pub tasks: Option<PathBuf>,
}

pub fn run(
    port: u16,
    llm: LlmProviderChoice,
    model: Option<String>,
    debounce_ms: u64,
    preload: Preload,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = llm.build(model.as_deref())?;

    let session = Session::new();
    let files = [
        (Dataset::Clients, preload.clients),
        (Dataset::Workers, preload.workers),
        (Dataset::Tasks, preload.tasks),
    ];
    for (dataset, path) in files {
        if let Some(path) = path {
            let summary = session.load_file(dataset, &path)?;
            println!(
                "  Loaded {} {} rows from {}",
                summary.rows.to_string().white().bold(),
                dataset,
                path.display()
            );
        }
    }

    let config = GridConfig {
        debounce: Duration::from_millis(debounce_ms),
    };

    let url = format!("http://localhost:{}/api", port);
    println!();
    println!(
        "{} {}",
        "Starting roster server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Provider: {} ({})", provider.name(), provider.config().model);
    println!("  Debounce: {} ms", debounce_ms);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let state = AppState::new(session, provider, config);
        tracing::debug!(provider = state.provider_name(), "application state ready");
        app::run_server(state, port).await
    })?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}

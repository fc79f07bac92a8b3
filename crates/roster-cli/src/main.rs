//! Roster CLI - dataset intake workbench.

mod cli;
mod commands;
mod logging;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use commands::serve::Preload;
use logging::{init_logging, LogConfig};

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbose(cli.verbose));

    let result = match cli.command {
        Commands::Serve {
            port,
            llm,
            model,
            debounce_ms,
            clients,
            workers,
            tasks,
        } => commands::serve::run(
            port,
            llm,
            model,
            debounce_ms,
            Preload {
                clients,
                workers,
                tasks,
            },
        ),

        Commands::Validate {
            file,
            dataset,
            llm,
            model,
            json,
        } => commands::validate::run(file, dataset, llm, model, json, cli.verbose),

        Commands::Rule {
            sentence,
            priority,
            llm,
            model,
        } => commands::rule::run(sentence, priority, llm, model, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

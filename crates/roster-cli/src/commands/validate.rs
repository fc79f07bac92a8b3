//! Validate command - one validation call for a data file.

use std::path::PathBuf;

use colored::Colorize;
use roster::{Dataset, Parser, RowValidator, ValidationError, ValidationGateway};

use crate::cli::LlmProviderChoice;

pub fn run(
    file: PathBuf,
    dataset: Dataset,
    llm: LlmProviderChoice,
    model: Option<String>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = Parser::new().parse_file(&file)?;
    if verbose {
        println!(
            "Parsed {} rows x {} columns ({})",
            table.row_count(),
            table.column_count(),
            table.format()
        );
    }

    let gateway = ValidationGateway::new(llm.build(model.as_deref())?);
    let rows = table.into_rows();
    let errors = gateway.validate(dataset, &rows)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&errors)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Validation of".cyan().bold(),
        file.display().to_string().white(),
        dataset
    );
    println!();

    if errors.is_empty() {
        println!("{} No problems reported in {} rows", "✓".green().bold(), rows.len());
        return Ok(());
    }

    print_errors(&errors);
    println!();
    println!(
        "{} {} problem(s) in {} rows",
        "✗".red().bold(),
        errors.len().to_string().red().bold(),
        rows.len()
    );
    Ok(())
}

fn print_errors(errors: &[ValidationError]) {
    let field_width = errors
        .iter()
        .map(|e| e.field.len())
        .max()
        .unwrap_or(0)
        .max("Field".len());

    println!(
        "  {:>5}  {:<width$}  {}",
        "Row".bold(),
        "Field".bold(),
        "Message".bold(),
        width = field_width
    );
    for error in errors {
        println!(
            "  {:>5}  {:<width$}  {}",
            error.row_index,
            error.field.yellow(),
            error.message,
            width = field_width
        );
    }
}

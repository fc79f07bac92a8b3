//! Rule command - generate one rule from a sentence.

use colored::Colorize;
use roster::{RuleBook, RuleBuilder, RuleGenerationGateway};

use crate::cli::LlmProviderChoice;

pub fn run(
    sentence: String,
    priority: i64,
    llm: LlmProviderChoice,
    model: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = RuleGenerationGateway::new(llm.build(model.as_deref())?);

    let mut form = RuleBuilder {
        prompt: sentence,
        priority,
        ..RuleBuilder::default()
    };
    let kind = gateway.generate(form.pending_prompt()?)?;

    let mut book = RuleBook::new();
    let rule = form.accept_generated(kind, &mut book)?;

    if verbose {
        eprintln!("{} {}", "Generated".green().bold(), rule.rule_type().label());
    }
    println!("{}", serde_json::to_string_pretty(&rule)?);
    Ok(())
}

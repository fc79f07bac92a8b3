//! Prompt templates for LLM interactions.

use crate::dataset::{Dataset, Row};
use crate::error::Result;

/// System prompt shared by providers that take one.
pub fn system_prompt() -> &'static str {
    "You are a careful assistant for a resource-allocation workbench. \
     When asked for JSON, respond with JSON only."
}

/// Build a prompt asking the model to check rows of one dataset.
pub fn validation_prompt(dataset: Dataset, rows: &[Row]) -> Result<String> {
    let data = serde_json::to_string_pretty(rows)?;

    Ok(format!(
        r#"You are an AI validator. Given spreadsheet data of type "{dataset}", check for:
- missing required fields
- empty string values
- invalid email fields (if applicable)

Return ONLY valid JSON in this format:
[
  {{
    "rowIndex": 0,
    "field": "email",
    "message": "Missing email"
  }}
]

Now validate this data:
{data}
"#
    ))
}

/// Build a few-shot prompt turning one sentence into a rule object.
pub fn rule_prompt(sentence: &str) -> String {
    format!(
        r#"You are an AI that converts rule descriptions into structured JSON.

Return only one JSON object and nothing else.

Supported types: "coRun", "slotRestriction", "loadLimit".

Examples:
Input: "Run tasks T1 and T2 together"
Output:
{{
  "type": "coRun",
  "tasks": ["T1", "T2"]
}}

Input: "Limit Backend group to 3 tasks per phase"
Output:
{{
  "type": "loadLimit",
  "group": "Backend",
  "maxSlotsPerPhase": 3
}}

Input: "Sales group needs at least 2 common slots"
Output:
{{
  "type": "slotRestriction",
  "group": "Sales",
  "minCommonSlots": 2
}}

Now respond with the JSON for:
"{sentence}"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_prompt_embeds_rows() {
        let mut row = Row::new();
        row.insert("email".into(), "".into());
        let prompt = validation_prompt(Dataset::Workers, &[row]).unwrap();

        assert!(prompt.contains("of type \"workers\""));
        assert!(prompt.contains("\"email\": \"\""));
        assert!(prompt.contains("\"rowIndex\": 0"));
    }

    #[test]
    fn test_rule_prompt_quotes_sentence() {
        let prompt = rule_prompt("Run T3 with T4");
        assert!(prompt.ends_with("\"Run T3 with T4\"\n"));
        assert!(prompt.contains("\"maxSlotsPerPhase\": 3"));
    }
}

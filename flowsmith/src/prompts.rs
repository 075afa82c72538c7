//! Prompts sent to the text generator at each workflow step.

use std::collections::HashMap;

use flowsmith_core::{FlowsmithError, Value};
use flowsmith_prompt::PromptTemplate;

use crate::workflow::ParsedRequirements;

pub const DRAFT_TEMPLATE: &str = "\
User requirements parsed: {{parsed}}

Create a draft workflow and list of tools needed to build the agent.
Do not return JSON yet, just human-readable details.";

pub const UPDATE_TEMPLATE: &str = "\
Current draft workflow:
{{draft}}

User requested changes:
{{change_request}}

Update only the necessary parts of the workflow, don't rebuild everything.
Return the complete revised workflow.";

pub const FINALIZE_TEMPLATE: &str = "\
Convert the following agent workflow and tools into a clean JSON format.
Respond with a single JSON object and nothing else.

{{draft}}";

fn render(template: &str, vars: &[(&str, Value)]) -> Result<String, FlowsmithError> {
    let vars: HashMap<String, Value> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    PromptTemplate::new(template).render(&vars)
}

pub fn draft_prompt(parsed: &ParsedRequirements) -> Result<String, FlowsmithError> {
    render(DRAFT_TEMPLATE, &[("parsed", serde_json::to_value(parsed)?)])
}

pub fn update_prompt(draft: &str, change_request: &str) -> Result<String, FlowsmithError> {
    render(
        UPDATE_TEMPLATE,
        &[
            ("draft", Value::from(draft)),
            ("change_request", Value::from(change_request)),
        ],
    )
}

pub fn finalize_prompt(draft: &str) -> Result<String, FlowsmithError> {
    render(FINALIZE_TEMPLATE, &[("draft", Value::from(draft))])
}

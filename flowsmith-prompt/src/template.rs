use std::collections::HashMap;

use flowsmith_core::{FlowsmithError, Value};
use regex::Regex;

const PLACEHOLDER: &str = r"\{\{\s*(\w+)\s*\}\}";

/// A text template with `{{ name }}` placeholders.
///
/// String values are inserted verbatim; any other value is inserted as
/// compact JSON. Placeholders without a value render as the empty string.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> Result<Vec<String>, FlowsmithError> {
        let pattern = placeholder_pattern()?;
        let mut names: Vec<String> = Vec::new();
        for caps in pattern.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, FlowsmithError> {
        let pattern = placeholder_pattern()?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            match vars.get(key) {
                Some(value) => value
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| value.to_string()),
                None => "".to_string(),
            }
        });
        Ok(rendered.to_string())
    }
}

fn placeholder_pattern() -> Result<Regex, FlowsmithError> {
    Regex::new(PLACEHOLDER).map_err(|e| FlowsmithError::InvalidConfig(e.to_string()))
}

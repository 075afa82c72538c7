use flowsmith_core::{StateSchema, Value};
use serde::{Deserialize, Serialize};

/// Prefix (case-insensitive) that accepts the current draft.
pub const CONFIRMATION_TOKEN: &str = "yes";
/// Input (case-insensitive) that ends the session at any prompt.
pub const EXIT_TOKEN: &str = "exit";

pub fn is_confirmation(feedback: &str) -> bool {
    feedback
        .trim_start()
        .to_lowercase()
        .starts_with(CONFIRMATION_TOKEN)
}

pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_TOKEN)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRequirements {
    pub goal: String,
}

/// Data threaded between the workflow steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub requirements: String,
    pub parsed: Option<ParsedRequirements>,
    pub draft: Option<String>,
    pub user_feedback: Option<String>,
    pub confirmed: bool,
    pub final_json: Option<Value>,
    /// Completed `update` steps.
    pub revisions: u32,
    pub exit_requested: bool,
}

impl WorkflowState {
    pub fn new(requirements: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
            ..Default::default()
        }
    }
}

/// Fields a step changed. `None` leaves the current value in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowUpdate {
    pub parsed: Option<ParsedRequirements>,
    pub draft: Option<String>,
    pub user_feedback: Option<String>,
    pub confirmed: Option<bool>,
    pub final_json: Option<Value>,
    pub revisions: Option<u32>,
    pub exit_requested: Option<bool>,
}

impl StateSchema for WorkflowState {
    type Update = WorkflowUpdate;

    fn apply(current: &Self, update: WorkflowUpdate) -> Self {
        let mut next = current.clone();
        if let Some(parsed) = update.parsed {
            next.parsed = Some(parsed);
        }
        if let Some(draft) = update.draft {
            next.draft = Some(draft);
        }
        if let Some(feedback) = update.user_feedback {
            next.user_feedback = Some(feedback);
        }
        if let Some(confirmed) = update.confirmed {
            next.confirmed = confirmed;
        }
        if let Some(final_json) = update.final_json {
            next.final_json = Some(final_json);
        }
        if let Some(revisions) = update.revisions {
            next.revisions = revisions;
        }
        if let Some(exit_requested) = update.exit_requested {
            next.exit_requested = exit_requested;
        }
        next
    }

    fn trace_repr(&self) -> String {
        format!(
            "requirements={:?} draft={} feedback={:?} confirmed={} revisions={} final={}",
            self.requirements,
            self.draft.as_ref().map(|d| d.len()).unwrap_or(0),
            self.user_feedback,
            self.confirmed,
            self.revisions,
            self.final_json.is_some()
        )
    }
}

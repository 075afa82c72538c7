use std::sync::Arc;

use async_trait::async_trait;
use flowsmith_core::{FlowsmithError, GraphState, JsonOutputParser, StateUpdate};
use flowsmith_graph::GraphNode;
use flowsmith_llm::TextGenerator;
use flowsmith_memory::{MemoryKey, SessionMemory};
use serde_json::Value;

use crate::console::{Console, InputEvent};
use crate::prompts;
use super::state::{
    is_confirmation, is_exit, ParsedRequirements, WorkflowState, WorkflowUpdate, EXIT_TOKEN,
};

type NodeResult = Result<StateUpdate<WorkflowState>, FlowsmithError>;

pub const PRESENT_HEADER: &str = "\n📋 Proposed Workflow & Tools:";
pub const CONFIRM_PROMPT: &str = "\nDo you confirm this? (yes / specify changes): ";

/// Turns the raw requirements into `{goal: ...}`.
pub struct ParseNode;

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for ParseNode {
    async fn invoke_with_context(
        &self,
        state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let requirements = state.data.requirements;
        let parsed = ParsedRequirements {
            goal: requirements.clone(),
        };

        memory.remember(MemoryKey::REQUIREMENTS, requirements);
        memory.remember(MemoryKey::PARSED, serde_json::to_value(&parsed)?);

        Ok(StateUpdate::new(WorkflowUpdate {
            parsed: Some(parsed),
            ..Default::default()
        }))
    }
}

/// Asks the generator for a first, human-readable draft.
pub struct DraftNode {
    generator: Arc<dyn TextGenerator>,
}

impl DraftNode {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for DraftNode {
    async fn invoke_with_context(
        &self,
        _state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let parsed: ParsedRequirements = memory.require(MemoryKey::PARSED)?;
        let draft: String = self.generator.invoke(prompts::draft_prompt(&parsed)?).await?;
        memory.remember(MemoryKey::DRAFT, draft.clone());

        Ok(StateUpdate::new(WorkflowUpdate {
            draft: Some(draft),
            ..Default::default()
        }))
    }
}

/// Shows the draft and waits for the user's verdict.
pub struct PresentNode {
    console: Arc<dyn Console>,
}

impl PresentNode {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for PresentNode {
    async fn invoke_with_context(
        &self,
        _state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let draft: String = memory.require(MemoryKey::DRAFT)?;
        self.console.print(PRESENT_HEADER);
        self.console.print(&draft);

        let feedback = match self.console.read_line(CONFIRM_PROMPT).await? {
            InputEvent::Line(line) => line,
            InputEvent::Eof => EXIT_TOKEN.to_string(),
        };

        Ok(StateUpdate::new(WorkflowUpdate {
            user_feedback: Some(feedback),
            ..Default::default()
        }))
    }
}

/// Classifies the feedback as confirmation, exit, or change request.
pub struct ConfirmNode;

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for ConfirmNode {
    async fn invoke_with_context(
        &self,
        state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let feedback = state.data.user_feedback.unwrap_or_default();

        if is_confirmation(&feedback) {
            memory.remember(MemoryKey::CONFIRMED, true);
            return Ok(StateUpdate::new(WorkflowUpdate {
                confirmed: Some(true),
                ..Default::default()
            }));
        }

        memory.remember(MemoryKey::CONFIRMED, false);
        if is_exit(&feedback) {
            return Ok(StateUpdate::new(WorkflowUpdate {
                confirmed: Some(false),
                exit_requested: Some(true),
                ..Default::default()
            }));
        }

        memory.remember(MemoryKey::USER_FEEDBACK, feedback.clone());
        Ok(StateUpdate::new(WorkflowUpdate {
            confirmed: Some(false),
            user_feedback: Some(feedback),
            ..Default::default()
        }))
    }
}

/// Applies the pending change request to the current draft.
pub struct UpdateNode {
    generator: Arc<dyn TextGenerator>,
}

impl UpdateNode {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for UpdateNode {
    async fn invoke_with_context(
        &self,
        state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let draft: String = memory.require(MemoryKey::DRAFT)?;
        let change_request: String = memory.require(MemoryKey::USER_FEEDBACK)?;

        let revised: String = self
            .generator
            .invoke(prompts::update_prompt(&draft, &change_request)?)
            .await?;
        memory.remember(MemoryKey::DRAFT, revised.clone());

        Ok(StateUpdate::new(WorkflowUpdate {
            draft: Some(revised),
            revisions: Some(state.data.revisions + 1),
            ..Default::default()
        }))
    }
}

/// The artifact must be a JSON object or array with at least one entry.
fn check_artifact(value: Value, output: &str) -> Result<Value, FlowsmithError> {
    let has_content = match &value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    };
    if has_content {
        Ok(value)
    } else {
        Err(FlowsmithError::ParseFailed {
            output: output.to_string(),
            reason: "expected a non-empty JSON object or array".to_string(),
        })
    }
}

/// Converts the agreed draft into JSON, re-asking when the output does not
/// parse or is not a usable workflow document.
pub struct FinalizeNode {
    generator: Arc<dyn TextGenerator>,
    attempts: usize,
    parser: JsonOutputParser<Value>,
}

impl FinalizeNode {
    pub fn new(generator: Arc<dyn TextGenerator>, attempts: usize) -> Self {
        Self {
            generator,
            attempts: attempts.max(1),
            parser: JsonOutputParser::new(),
        }
    }
}

#[async_trait]
impl GraphNode<WorkflowState, SessionMemory> for FinalizeNode {
    async fn invoke_with_context(
        &self,
        _state: GraphState<WorkflowState>,
        memory: &mut SessionMemory,
    ) -> NodeResult {
        let draft: String = memory.require(MemoryKey::DRAFT)?;
        let prompt = prompts::finalize_prompt(&draft)?;

        let mut attempt = 1;
        let final_json = loop {
            let output: String = self.generator.invoke(prompt.clone()).await?;
            let parsed = self
                .parser
                .parse(&output)
                .and_then(|value| check_artifact(value, &output));
            match parsed {
                Ok(value) => break value,
                Err(err) if attempt < self.attempts => {
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "finalize output is not a usable JSON document, regenerating"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        };

        memory.remember(MemoryKey::FINAL_JSON, final_json.clone());

        Ok(StateUpdate::new(WorkflowUpdate {
            final_json: Some(final_json),
            ..Default::default()
        }))
    }
}

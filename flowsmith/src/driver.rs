use std::sync::Arc;

use flowsmith_core::{FlowsmithError, GraphState};
use flowsmith_graph::GraphError;
use flowsmith_memory::SessionMemory;
use serde_json::Value;
use thiserror::Error;

use crate::console::{Console, InputEvent};
use crate::workflow::{is_exit, WorkflowGraph, WorkflowState};

pub const WELCOME: &str = "🤖 Welcome to the Agent Builder Chat! Type 'exit' anytime to quit.\n";
pub const REQUIREMENTS_PROMPT: &str = "📝 Enter your agent requirements: ";
pub const FINAL_HEADER: &str = "\n✅ Final Workflow JSON:";
pub const GOODBYE: &str = "\nExiting Agent Builder. Goodbye!";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Workflow(#[from] GraphError),
    #[error(transparent)]
    Session(#[from] FlowsmithError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The user confirmed a draft; carries the final artifact.
    Finalized(Value),
    /// The user typed the exit token or closed the input.
    Exited,
    /// Every allowed change request was used without a confirmation.
    RevisionLimitReached { revisions: u32 },
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// `None` when the user left before giving requirements.
    pub state: Option<WorkflowState>,
    pub memory: SessionMemory,
}

/// Reads the requirements, runs the workflow once, and prints the result.
pub struct ChatDriver {
    graph: WorkflowGraph,
    console: Arc<dyn Console>,
}

impl ChatDriver {
    pub fn new(graph: WorkflowGraph, console: Arc<dyn Console>) -> Self {
        Self { graph, console }
    }

    pub async fn run(&self) -> Result<RunReport, DriverError> {
        self.console.print(WELCOME);

        let mut memory = SessionMemory::new();
        let Some(requirements) = self.read_requirements().await? else {
            self.console.print(GOODBYE);
            return Ok(RunReport {
                outcome: RunOutcome::Exited,
                state: None,
                memory,
            });
        };

        tracing::info!("starting workflow");
        let initial = GraphState::new(WorkflowState::new(requirements));
        let finished = self.graph.invoke_graph(initial, &mut memory).await?.data;
        tracing::debug!(
            state = %flowsmith_core::StateSchema::trace_repr(&finished),
            "workflow finished"
        );

        let outcome = match &finished.final_json {
            Some(artifact) => {
                self.console.print(FINAL_HEADER);
                self.console
                    .print(&serde_json::to_string_pretty(artifact).map_err(FlowsmithError::from)?);
                RunOutcome::Finalized(artifact.clone())
            }
            None if finished.exit_requested => {
                self.console.print(GOODBYE);
                RunOutcome::Exited
            }
            None => {
                self.console.print(&format!(
                    "\nStopping after {} revisions without a confirmation. Goodbye!",
                    finished.revisions
                ));
                RunOutcome::RevisionLimitReached {
                    revisions: finished.revisions,
                }
            }
        };

        Ok(RunReport {
            outcome,
            state: Some(finished),
            memory,
        })
    }

    /// Prompts until the user types something. `None` means exit.
    async fn read_requirements(&self) -> Result<Option<String>, FlowsmithError> {
        loop {
            match self.console.read_line(REQUIREMENTS_PROMPT).await? {
                InputEvent::Eof => return Ok(None),
                InputEvent::Line(line) if is_exit(&line) => return Ok(None),
                InputEvent::Line(line) if line.trim().is_empty() => continue,
                InputEvent::Line(line) => return Ok(Some(line)),
            }
        }
    }
}

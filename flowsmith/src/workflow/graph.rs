use std::sync::Arc;

use flowsmith_graph::{ExecutableGraph, ExecutionConfig, GraphBuilder, GraphState, Observer, END};
use flowsmith_llm::TextGenerator;
use flowsmith_memory::SessionMemory;

use super::nodes::{ConfirmNode, DraftNode, FinalizeNode, ParseNode, PresentNode, UpdateNode};
use super::state::WorkflowState;
use crate::console::Console;

pub const PARSE: &str = "parse";
pub const DRAFT: &str = "draft";
pub const PRESENT: &str = "present";
pub const CONFIRM: &str = "confirm";
pub const UPDATE: &str = "update";
pub const FINALIZE: &str = "finalize";

pub type WorkflowGraph = ExecutableGraph<WorkflowState, SessionMemory>;

#[derive(Clone, Debug)]
pub struct WorkflowOptions {
    /// Change requests accepted before the run gives up. `None` never gives up.
    pub max_revisions: Option<u32>,
    /// Generations tried in `finalize` before malformed JSON is an error.
    pub finalize_attempts: usize,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            max_revisions: Some(10),
            finalize_attempts: 2,
        }
    }
}

impl WorkflowOptions {
    /// Node executions needed by the longest run the revision cap allows:
    /// parse, draft, `max + 1` present/confirm pairs, `max` updates, finalize.
    pub fn max_steps(&self) -> Option<usize> {
        self.max_revisions.map(|max| 3 * max as usize + 5)
    }
}

/// Where `confirm` hands over: finalize on a yes, stop on exit or when the
/// revision budget is spent, otherwise revise.
pub fn route_after_confirm(
    state: &GraphState<WorkflowState>,
    max_revisions: Option<u32>,
) -> String {
    let data = &state.data;
    if data.confirmed {
        FINALIZE.to_string()
    } else if data.exit_requested {
        END.to_string()
    } else if max_revisions.is_some_and(|max| data.revisions >= max) {
        tracing::warn!(revisions = data.revisions, "revision limit reached");
        END.to_string()
    } else {
        UPDATE.to_string()
    }
}

pub fn build_workflow_graph(
    generator: Arc<dyn TextGenerator>,
    console: Arc<dyn Console>,
    options: &WorkflowOptions,
    observer: Option<Arc<dyn Observer>>,
) -> WorkflowGraph {
    let max_revisions = options.max_revisions;

    let mut builder = GraphBuilder::new()
        .add_node(PARSE, ParseNode)
        .add_node(DRAFT, DraftNode::new(generator.clone()))
        .add_node(PRESENT, PresentNode::new(console))
        .add_node(CONFIRM, ConfirmNode)
        .add_node(UPDATE, UpdateNode::new(generator.clone()))
        .add_node(FINALIZE, FinalizeNode::new(generator, options.finalize_attempts))
        .set_entry(PARSE)
        .add_edge(PARSE, DRAFT)
        .add_edge(DRAFT, PRESENT)
        .add_edge(PRESENT, CONFIRM)
        .add_conditional_edge(CONFIRM, move |state: &GraphState<WorkflowState>| {
            route_after_confirm(state, max_revisions)
        })
        .add_edge(UPDATE, PRESENT)
        .add_edge(FINALIZE, END)
        .with_config(ExecutionConfig::default().with_max_steps(options.max_steps()));

    if let Some(observer) = observer {
        builder = builder.with_observer(observer);
    }

    builder.build()
}

//! The requirements → draft → review → finalize state machine.

mod graph;
mod nodes;
mod state;

pub use graph::{
    build_workflow_graph, route_after_confirm, WorkflowGraph, WorkflowOptions, CONFIRM, DRAFT,
    FINALIZE, PARSE, PRESENT, UPDATE,
};
pub use nodes::{
    ConfirmNode, DraftNode, FinalizeNode, ParseNode, PresentNode, UpdateNode, CONFIRM_PROMPT,
    PRESENT_HEADER,
};
pub use state::{
    is_confirmation, is_exit, ParsedRequirements, WorkflowState, WorkflowUpdate,
    CONFIRMATION_TOKEN, EXIT_TOKEN,
};

mod config;
mod error;
mod graph;
mod observer;

pub use config::ExecutionConfig;
pub use error::GraphError;
pub use graph::{ExecutableGraph, GraphBuilder, GraphNode, Router, END};
pub use observer::Observer;
pub use flowsmith_core::state::{GraphState, StateSchema, StateUpdate};

//! Interactive builder that turns plain-language agent requirements into a
//! reviewed, machine-readable workflow definition.

pub mod config;
pub mod console;
pub mod driver;
pub mod prompts;
pub mod workflow;

pub use config::{Cli, Settings};
pub use console::{Console, InputEvent, TerminalConsole};
pub use driver::{ChatDriver, DriverError, RunOutcome, RunReport};
pub use workflow::{build_workflow_graph, WorkflowGraph, WorkflowOptions, WorkflowState};

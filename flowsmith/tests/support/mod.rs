#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flowsmith::workflow::{build_workflow_graph, WorkflowGraph, WorkflowOptions};
use flowsmith::{Console, InputEvent};
use flowsmith_core::{FlowsmithError, Runnable};
use flowsmith_graph::Observer;
use flowsmith_llm::TextGenerator;

/// Replays canned lines and records everything printed.
#[derive(Default)]
pub struct ScriptedConsole {
    inputs: Mutex<VecDeque<InputEvent>>,
    pub prompts: Mutex<Vec<String>>,
    pub printed: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            inputs: Mutex::new(
                lines
                    .iter()
                    .map(|line| InputEvent::Line(line.to_string()))
                    .collect(),
            ),
            ..Default::default()
        })
    }

    pub fn output(&self) -> String {
        self.printed.lock().unwrap().join("\n")
    }

    pub fn prompt_count(&self, prompt: &str) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|seen| seen.as_str() == prompt)
            .count()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&self, prompt: &str) -> Result<InputEvent, FlowsmithError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .inputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(InputEvent::Eof))
    }

    fn print(&self, text: &str) {
        self.printed.lock().unwrap().push(text.to_string());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Draft,
    Update,
    Finalize,
}

/// Answers by recognising which step's prompt it was given.
pub struct FakeGenerator {
    finalize_outputs: Mutex<VecDeque<String>>,
    failing_step: Option<Step>,
    pub calls: Mutex<Vec<(Step, String)>>,
}

impl FakeGenerator {
    pub fn new() -> Arc<Self> {
        Self::with_finalize_outputs(&[r#"{"workflow": ["fetch", "summarize"], "tools": ["http"]}"#])
    }

    pub fn with_finalize_outputs(outputs: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            finalize_outputs: Mutex::new(outputs.iter().map(|s| s.to_string()).collect()),
            failing_step: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every call for `step` fails like an unreachable provider.
    pub fn failing_on(step: Step) -> Arc<Self> {
        Arc::new(Self {
            finalize_outputs: Mutex::new(VecDeque::new()),
            failing_step: Some(step),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn count(&self, step: Step) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen, _)| *seen == step)
            .count()
    }

    pub fn prompts(&self, step: Step) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(seen, _)| *seen == step)
            .map(|(_, prompt)| prompt.clone())
            .collect()
    }
}

#[async_trait]
impl Runnable<String, String> for FakeGenerator {
    async fn invoke(&self, prompt: String) -> Result<String, FlowsmithError> {
        let step = if prompt.contains("clean JSON format") {
            Step::Finalize
        } else if prompt.contains("User requested changes") {
            Step::Update
        } else {
            Step::Draft
        };
        let revision = self.count(Step::Update);
        self.calls.lock().unwrap().push((step, prompt));

        if self.failing_step == Some(step) {
            return Err(FlowsmithError::LlmProvider(
                "service unavailable".to_string(),
            ));
        }

        Ok(match step {
            Step::Draft => "DRAFT v0".to_string(),
            Step::Update => format!("DRAFT v{}", revision + 1),
            Step::Finalize => self
                .finalize_outputs
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "not json".to_string()),
        })
    }
}

/// Records node starts in order.
#[derive(Default)]
pub struct NodeTrace {
    pub nodes: Mutex<Vec<String>>,
}

impl NodeTrace {
    pub fn visited(&self) -> Vec<String> {
        self.nodes.lock().unwrap().clone()
    }
}

impl Observer for NodeTrace {
    fn on_node_start(&self, node: &str) {
        self.nodes.lock().unwrap().push(node.to_string());
    }
}

pub fn graph_with(
    generator: Arc<FakeGenerator>,
    console: Arc<ScriptedConsole>,
    options: &WorkflowOptions,
    trace: Arc<NodeTrace>,
) -> WorkflowGraph {
    let generator: Arc<dyn TextGenerator> = generator;
    let console: Arc<dyn Console> = console;
    let observer: Arc<dyn Observer> = trace;
    build_workflow_graph(generator, console, options, Some(observer))
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use flowsmith_core::{FlowsmithError, GraphState, StateSchema, StateUpdate};

use crate::{ExecutionConfig, GraphError, Observer};

/// Reserved edge target that ends the run.
pub const END: &str = "__end__";

/// A step in the graph. `C` is the per-run context the caller owns and lends
/// to every node (session memory, handles, ...).
#[async_trait]
pub trait GraphNode<S: StateSchema, C: Send>: Send + Sync {
    async fn invoke_with_context(
        &self,
        state: GraphState<S>,
        ctx: &mut C,
    ) -> Result<StateUpdate<S>, FlowsmithError>;
}

/// Picks the next node from the state produced by the node it hangs off.
pub type Router<S> = Box<dyn Fn(&GraphState<S>) -> String + Send + Sync>;

enum Edge<S: StateSchema> {
    Static(String),
    Conditional(Router<S>),
}

pub struct GraphBuilder<S: StateSchema, C: Send> {
    nodes: HashMap<String, Box<dyn GraphNode<S, C>>>,
    edges: HashMap<String, Edge<S>>,
    entry: Option<String>,
    config: ExecutionConfig,
    observer: Option<Arc<dyn Observer>>,
}

impl<S: StateSchema, C: Send> Default for GraphBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateSchema, C: Send> GraphBuilder<S, C> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
            config: ExecutionConfig::default(),
            observer: None,
        }
    }

    pub fn add_node<N>(mut self, name: &str, node: N) -> Self
    where
        N: GraphNode<S, C> + 'static,
    {
        self.nodes.insert(name.to_string(), Box::new(node));
        self
    }

    pub fn set_entry(mut self, name: &str) -> Self {
        self.entry = Some(name.to_string());
        self
    }

    /// Adds an unconditional edge. A node has at most one outgoing edge; a
    /// later call replaces an earlier one.
    pub fn add_edge(mut self, from: &str, to: &str) -> Self {
        self.edges
            .insert(from.to_string(), Edge::Static(to.to_string()));
        self
    }

    pub fn add_conditional_edge<F>(mut self, from: &str, router: F) -> Self
    where
        F: Fn(&GraphState<S>) -> String + Send + Sync + 'static,
    {
        self.edges
            .insert(from.to_string(), Edge::Conditional(Box::new(router)));
        self
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> ExecutableGraph<S, C> {
        ExecutableGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry: self.entry,
            config: self.config,
            observer: self.observer,
        }
    }
}

pub struct ExecutableGraph<S: StateSchema, C: Send> {
    nodes: HashMap<String, Box<dyn GraphNode<S, C>>>,
    edges: HashMap<String, Edge<S>>,
    entry: Option<String>,
    config: ExecutionConfig,
    observer: Option<Arc<dyn Observer>>,
}

impl<S: StateSchema, C: Send> ExecutableGraph<S, C> {
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn is_target(&self, name: &str) -> bool {
        name == END || self.nodes.contains_key(name)
    }

    /// Checks the wiring that can be checked without running: the entry
    /// exists and every static edge joins known nodes.
    pub fn validate(&self) -> Result<(), GraphError> {
        let entry = self.entry.as_ref().ok_or(GraphError::MissingEntry)?;
        if !self.nodes.contains_key(entry) {
            return Err(GraphError::MissingNode {
                node: entry.clone(),
            });
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphError::MissingNode { node: from.clone() });
            }
            if let Edge::Static(to) = edge {
                if !self.is_target(to) {
                    return Err(GraphError::InvalidEdge {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Runs from the entry node until `END` or a node without an outgoing
    /// edge, folding every node's update into the state.
    pub async fn invoke_graph(
        &self,
        mut state: GraphState<S>,
        ctx: &mut C,
    ) -> Result<GraphState<S>, GraphError> {
        self.validate()?;
        let mut current = self.entry.clone().ok_or(GraphError::MissingEntry)?;
        let mut steps = 0usize;

        while current != END {
            if let Some(max) = self.config.max_steps {
                if steps >= max {
                    return Err(GraphError::MaxStepsExceeded {
                        max,
                        reached: steps,
                    });
                }
            }
            steps += 1;

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::MissingNode {
                    node: current.clone(),
                })?;

            tracing::debug!(node = %current, step = steps, "entering node");
            if let Some(observer) = &self.observer {
                observer.on_node_start(&current);
            }
            let started = Instant::now();

            let update = match node.invoke_with_context(state.clone(), ctx).await {
                Ok(update) => update,
                Err(err) => {
                    let error = GraphError::NodeFailed {
                        node: current.clone(),
                        source: Box::new(err),
                    };
                    tracing::debug!(node = %current, error = %error, "node failed");
                    if let Some(observer) = &self.observer {
                        observer.on_error(&current, &error);
                    }
                    return Err(error);
                }
            };
            state = state.apply(update);

            if let Some(observer) = &self.observer {
                observer.on_node_end(&current, started.elapsed().as_millis());
            }

            let next = match self.edges.get(&current) {
                Some(Edge::Static(to)) => to.clone(),
                Some(Edge::Conditional(router)) => {
                    let to = router(&state);
                    if !self.is_target(&to) {
                        return Err(GraphError::InvalidEdge { from: current, to });
                    }
                    to
                }
                None => break,
            };
            tracing::debug!(from = %current, to = %next, "transition");
            current = next;
        }

        Ok(state)
    }
}

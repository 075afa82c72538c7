use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph has no entry node")]
    MissingEntry,
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("missing node: {node}")]
    MissingNode { node: String },
    #[error("invalid edge from '{from}' to '{to}'")]
    InvalidEdge { from: String, to: String },
    #[error("Max steps exceeded: reached {reached}, limit {max}")]
    MaxStepsExceeded { max: usize, reached: usize },
}

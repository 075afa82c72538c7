use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowsmithError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Max retries ({max}) exceeded: {last}")]
    MaxRetriesExceeded { max: usize, last: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

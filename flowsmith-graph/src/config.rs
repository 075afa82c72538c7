#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Upper bound on node executions in one invocation; `None` disables it.
    pub max_steps: Option<usize>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(50),
        }
    }
}

impl ExecutionConfig {
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

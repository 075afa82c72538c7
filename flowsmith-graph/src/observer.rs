use crate::GraphError;

pub trait Observer: Send + Sync {
    fn on_node_start(&self, _node: &str) {}
    fn on_node_end(&self, _node: &str, _duration_ms: u128) {}
    fn on_error(&self, _node: &str, _error: &GraphError) {}
}

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// State carried between graph nodes. Nodes return a partial `Update`; the
/// schema decides how it folds into the current state.
pub trait StateSchema:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + std::fmt::Debug + 'static
{
    type Update: Serialize
        + DeserializeOwned
        + Clone
        + Default
        + Send
        + Sync
        + std::fmt::Debug
        + 'static;

    fn apply(current: &Self, update: Self::Update) -> Self;

    /// Human-readable representation for tracing/debugging.
    fn trace_repr(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "<unserializable>".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct GraphState<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> GraphState<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }

    pub fn apply(self, update: StateUpdate<S>) -> Self {
        Self {
            data: S::apply(&self.data, update.data),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct StateUpdate<S: StateSchema> {
    pub data: S::Update,
}

impl<S: StateSchema> StateUpdate<S> {
    pub fn new(data: S::Update) -> Self {
        Self { data }
    }

    /// An update that leaves every field untouched.
    pub fn unchanged() -> Self {
        Self {
            data: S::Update::default(),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;

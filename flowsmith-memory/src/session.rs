use std::collections::HashMap;

use flowsmith_core::{FlowsmithError, TryFromValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys the workflow stores in [`SessionMemory`].
pub struct MemoryKey;

impl MemoryKey {
    /// Raw requirements text as typed by the user.
    pub const REQUIREMENTS: &'static str = "requirements";
    /// Structured requirements, `{"goal": ...}`.
    pub const PARSED: &'static str = "parsed";
    /// Current human-readable workflow draft.
    pub const DRAFT: &'static str = "draft";
    /// Pending change request.
    pub const USER_FEEDBACK: &'static str = "user_feedback";
    pub const CONFIRMED: &'static str = "confirmed";
    /// Finalized JSON artifact. Once present the run is over.
    pub const FINAL_JSON: &'static str = "final_json";
}

/// Key-value store scoped to a single run.
///
/// Owned by whoever drives the run and handed to each step explicitly; it is
/// never shared across threads and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    entries: HashMap<String, Value>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn remember(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`, or `default` when absent.
    pub fn recall(&self, key: &str, default: Value) -> Value {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Deserializes the value under `key`. `Ok(None)` when nothing is stored.
    pub fn recall_as<T: TryFromValue>(&self, key: &str) -> Result<Option<T>, FlowsmithError> {
        self.entries
            .get(key)
            .cloned()
            .map(T::try_from_value)
            .transpose()
    }

    /// Like [`recall_as`](Self::recall_as) but treats absence as an error.
    pub fn require<T: TryFromValue>(&self, key: &str) -> Result<T, FlowsmithError> {
        self.recall_as(key)?
            .ok_or_else(|| FlowsmithError::Custom(format!("session memory has no '{key}'")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! The shared key-value store for one orchestration run.
//!
//! A [`Context`] is created from the caller's input at run start, mutated
//! only by the orchestrator as steps complete, and discarded when the run
//! returns. Step result slices are write-once: the first value recorded
//! under `<step>_results` wins for the remainder of the run.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::error::{CanopyError, Result};

/// Shared mutable context for a single orchestration run.
///
/// Backed by a `serde_json::Map`, so key iteration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Map<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from caller input.
    ///
    /// `Null` is accepted as an empty input. Any other non-object value is
    /// a context-initialization error, the only error class this type
    /// produces. Each recognized domain slice is copied verbatim; absent
    /// slices become empty arrays so downstream readers never branch on a
    /// missing key. Per-slice item counts are stored under `metadata`.
    pub fn from_input(input: Value, domain_slices: &[&str]) -> Result<Self> {
        let source = match input {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CanopyError::ContextInit {
                    message: format!(
                        "expected a key-value structure, got {}",
                        json_type_name(&other)
                    ),
                });
            }
        };

        let mut entries = Map::new();
        let mut metadata = Map::new();

        for slice in domain_slices {
            let value = source.get(*slice).cloned().unwrap_or_else(|| json!([]));
            let count = value.as_array().map(|a| a.len()).unwrap_or(0);
            metadata.insert(format!("total_{}", slice), json!(count));
            entries.insert((*slice).to_string(), value);
        }

        entries.insert("original_input".to_string(), Value::Object(source));
        entries.insert("metadata".to_string(), Value::Object(metadata));

        Ok(Self { entries })
    }

    /// Look up a top-level context key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The result slice recorded for a step, if any.
    pub fn step_results(&self, step: &str) -> Option<&Value> {
        self.entries.get(&results_key(step))
    }

    /// Record a step's result slice under `<step>_results`.
    ///
    /// Returns `false` without modifying the context if the slice already
    /// exists — result slices are written at most once per run.
    pub fn record_step_results(&mut self, step: &str, data: Value) -> bool {
        let key = results_key(step);
        if self.entries.contains_key(&key) {
            warn!("Result slice '{}' already recorded; keeping first write", key);
            return false;
        }
        self.entries.insert(key, data);
        true
    }

    /// Store a cross-step derived index (e.g. an id-to-score lookup).
    pub fn set_index(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Context key holding a step's result slice.
fn results_key(step: &str) -> String {
    format!("{}_results", step)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

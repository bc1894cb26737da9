//! Step descriptor: a named analysis function plus its failure fallback.
//!
//! Descriptors are immutable configuration, defined once at orchestrator
//! construction. Their order in the sequence is part of the contract —
//! later steps may read earlier steps' result slices from the context.

use std::fmt;

use serde_json::{json, Value};

use crate::context::Context;
use crate::error::Result;

/// A caller-supplied analysis function.
///
/// Called synchronously with the shared context; returns the step's result
/// record or an error. Must not mutate the context (it only gets
/// a shared reference anyway).
pub type StepFn = Box<dyn Fn(&Context) -> Result<Value> + Send + Sync>;

/// Optional hook deriving cross-step lookup indices from a result record.
///
/// Runs after a successful merge; returns `(context key, index value)`
/// pairs the orchestrator stores for later steps to consult.
pub type IndexFn = Box<dyn Fn(&Value) -> Vec<(String, Value)> + Send + Sync>;

/// Static configuration for one step in the sequence.
pub struct StepDescriptor {
    name: String,
    run: StepFn,
    fallback: Value,
    max_retries: Option<u32>,
    index: Option<IndexFn>,
}

impl StepDescriptor {
    /// Create a descriptor with an empty-object fallback and the
    /// orchestrator's default retry count.
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
            fallback: json!({}),
            max_retries: None,
            index: None,
        }
    }

    /// Set the fallback record substituted when retries exhaust.
    ///
    /// Should be empty-collection-shaped: downstream steps see it as a
    /// well-formed result slice, never a missing key.
    pub fn fallback(mut self, record: Value) -> Self {
        self.fallback = record;
        self
    }

    /// Override the orchestrator's default retry count for this step.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Attach a derived-index hook.
    pub fn index<F>(mut self, derive: F) -> Self
    where
        F: Fn(&Value) -> Vec<(String, Value)> + Send + Sync + 'static,
    {
        self.index = Some(Box::new(derive));
        self
    }

    /// Step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured fallback record.
    pub fn fallback_record(&self) -> &Value {
        &self.fallback
    }

    /// Per-step retry override, if any.
    pub fn retries_override(&self) -> Option<u32> {
        self.max_retries
    }

    /// Invoke the step function once against the current context.
    pub fn execute(&self, ctx: &Context) -> Result<Value> {
        (self.run)(ctx)
    }

    /// Derive cross-step indices from a successful result record.
    pub fn derive_indices(&self, data: &Value) -> Vec<(String, Value)> {
        match &self.index {
            Some(derive) => derive(data),
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("name", &self.name)
            .field("fallback", &self.fallback)
            .field("max_retries", &self.max_retries)
            .field("has_index", &self.index.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fallback_is_empty_object() {
        let step = StepDescriptor::new("sourcing", |_| Ok(json!({})));
        assert_eq!(step.fallback_record(), &json!({}));
        assert_eq!(step.retries_override(), None);
    }

    #[test]
    fn builder_sets_fallback_and_retries() {
        let step = StepDescriptor::new("logistics", |_| Ok(json!({})))
            .fallback(json!({"optimized_routes": []}))
            .max_retries(5);

        assert_eq!(step.fallback_record(), &json!({"optimized_routes": []}));
        assert_eq!(step.retries_override(), Some(5));
    }

    #[test]
    fn execute_invokes_the_step_function() {
        let step = StepDescriptor::new("sourcing", |ctx: &Context| {
            let suppliers = ctx.get("suppliers").cloned().unwrap_or(json!([]));
            Ok(json!({"echo": suppliers}))
        });

        let ctx = Context::from_input(json!({"suppliers": [1, 2]}), &["suppliers"]).unwrap();
        let result = step.execute(&ctx).unwrap();
        assert_eq!(result, json!({"echo": [1, 2]}));
    }

    #[test]
    fn derive_indices_defaults_to_empty() {
        let step = StepDescriptor::new("inventory", |_| Ok(json!({})));
        assert!(step.derive_indices(&json!({"waste_analysis": []})).is_empty());
    }

    #[test]
    fn derive_indices_runs_the_hook() {
        let step = StepDescriptor::new("sourcing", |_| Ok(json!({}))).index(|data| {
            vec![("echo_index".to_string(), data.clone())]
        });

        let indices = step.derive_indices(&json!({"analysis": []}));
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].0, "echo_index");
    }

    #[test]
    fn debug_omits_the_closures() {
        let step = StepDescriptor::new("carbon_accounting", |_| Ok(json!({})));
        let repr = format!("{:?}", step);
        assert!(repr.contains("carbon_accounting"));
        assert!(repr.contains("has_index"));
    }
}

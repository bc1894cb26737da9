//! Sequential step orchestration with graceful degradation.
//!
//! The orchestrator owns the shared context, the fixed step sequence, the
//! retry policy, and result aggregation. Steps run strictly one after
//! another: a step may assume every earlier step's result slice is present
//! and final, real output or fallback, when it runs.
//!
//! `run()` never returns an error. Step failures are absorbed into
//! fallback records; context-initialization and aggregation failures are
//! captured on the returned record.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::context::{Context, ContextFlowLog};
use crate::error::{CanopyError, Result};
use crate::runner::record::{ExecutionSummary, OrchestrationRecord};
use crate::runner::retry::{execute_with_retry, RetryPolicy};
use crate::steps::{StepDescriptor, StepExecution, StepStatus};

/// Deterministic sequential executor for a fixed list of named steps.
///
/// Holds no run-scoped state between invocations: each `run()` builds a
/// fresh context, so concurrent runs of clones are fully independent.
#[derive(Debug)]
pub struct Orchestrator {
    steps: Vec<StepDescriptor>,
    policy: RetryPolicy,
    domain_slices: Vec<String>,
}

impl Orchestrator {
    /// Create an orchestrator over a fixed step sequence.
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        Self {
            steps,
            policy: RetryPolicy::default(),
            domain_slices: Vec::new(),
        }
    }

    /// Replace the default retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Declare the input slices copied into the context at run start.
    pub fn with_domain_slices<I, S>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_slices = slices.into_iter().map(Into::into).collect();
        self
    }

    /// Step names in sequence order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(StepDescriptor::name).collect()
    }

    /// Execute the full sequence against `initial_input`.
    ///
    /// Synchronous and blocking; always returns a structurally valid
    /// record. Callers detect degraded runs by inspecting
    /// `execution_summary.orchestration_success` and per-step statuses,
    /// never by catching errors.
    pub fn run(&self, initial_input: Value) -> OrchestrationRecord {
        let started = Instant::now();
        let start_time = Utc::now();
        let orchestration_id = format!("orch_{}", start_time.timestamp_millis());
        debug!(
            "Orchestration {} starting: {} steps",
            orchestration_id,
            self.steps.len()
        );

        let mut agent_results: BTreeMap<String, StepExecution> = BTreeMap::new();
        let mut flow = ContextFlowLog::new();
        let mut final_results = Value::Object(Map::new());
        let mut orchestration_error = None;

        let slices: Vec<&str> = self.domain_slices.iter().map(String::as_str).collect();
        match Context::from_input(initial_input, &slices) {
            Ok(mut ctx) => {
                for step in &self.steps {
                    let execution = execute_with_retry(step, &ctx, &self.policy);

                    if execution.status == StepStatus::Completed {
                        let keys = top_level_keys(&execution.data);
                        if ctx.record_step_results(step.name(), execution.data.clone()) {
                            flow.record(step.name(), keys);
                        }
                        for (key, value) in step.derive_indices(&execution.data) {
                            ctx.set_index(&key, value);
                        }
                    } else {
                        warn!(
                            "Step '{}' exhausted retries; substituting fallback",
                            step.name()
                        );
                        ctx.record_step_results(step.name(), step.fallback_record().clone());
                    }

                    agent_results.insert(step.name().to_string(), execution);
                }

                match self.aggregate(&ctx) {
                    Ok(aggregated) => final_results = aggregated,
                    Err(err) => orchestration_error = Some(err.to_string()),
                }
            }
            Err(err) => orchestration_error = Some(err.to_string()),
        }

        let execution_summary = ExecutionSummary::compute(
            &agent_results,
            flow.len(),
            orchestration_error.is_none(),
        );
        debug!(
            "Orchestration {} finished: {}/{} steps completed",
            orchestration_id, execution_summary.successful_agents, execution_summary.total_agents
        );

        OrchestrationRecord {
            orchestration_id,
            start_time,
            end_time: Utc::now(),
            total_execution_time: started.elapsed().as_secs_f64(),
            agent_results,
            context_flow: flow.into_events(),
            final_results,
            execution_summary,
            orchestration_error,
        }
    }

    /// Read every step's result slice back out of the context.
    ///
    /// Every slice is present by construction, real output or fallback,
    /// so a missing one is an orchestration-level aggregation error.
    fn aggregate(&self, ctx: &Context) -> Result<Value> {
        let mut aggregated = Map::new();

        for step in &self.steps {
            let slice = ctx.step_results(step.name()).cloned().ok_or_else(|| {
                CanopyError::Aggregation {
                    message: format!("missing result slice for step '{}'", step.name()),
                }
            })?;
            aggregated.insert(step.name().to_string(), slice);
        }

        let produced = aggregated.len();
        aggregated.insert(
            "orchestration_metadata".to_string(),
            json!({
                "successful_agents": produced,
                "data_flow_integrity": produced + 1 >= self.steps.len(),
            }),
        );

        Ok(Value::Object(aggregated))
    }
}

fn top_level_keys(data: &Value) -> Vec<String> {
    match data.as_object() {
        Some(map) => map.keys().cloned().collect(),
        None => Vec::new(),
    }
}

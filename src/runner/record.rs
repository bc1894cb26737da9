//! The orchestration record: the full output of one run.
//!
//! Field names are a stable wire contract — the HTTP/CLI layers sitting on
//! top of this crate serialize the record as-is into API responses and
//! logs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ContextFlowEvent;
use crate::error::Result;
use crate::steps::{StepExecution, StepStatus};

/// Roll-up counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Steps in the sequence.
    pub total_agents: usize,
    /// Steps that reached `Completed`.
    pub successful_agents: usize,
    /// Steps resolved via fallback.
    pub failed_agents: usize,
    /// Entries in the context flow log.
    pub context_flow_steps: usize,
    /// False only when an orchestration-level error occurred; step
    /// failures converted to fallback do not flip this.
    pub orchestration_success: bool,
}

impl ExecutionSummary {
    /// Compute the summary from the per-step results.
    pub fn compute(
        results: &BTreeMap<String, StepExecution>,
        flow_steps: usize,
        orchestration_success: bool,
    ) -> Self {
        let successful = results
            .values()
            .filter(|r| r.status == StepStatus::Completed)
            .count();
        let failed = results
            .values()
            .filter(|r| r.status == StepStatus::Failed)
            .count();

        Self {
            total_agents: results.len(),
            successful_agents: successful,
            failed_agents: failed,
            context_flow_steps: flow_steps,
            orchestration_success,
        }
    }
}

/// Complete output of one `run()` invocation. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationRecord {
    /// Time-based run identifier, informational only.
    pub orchestration_id: String,

    /// Wall-clock start of the run.
    pub start_time: DateTime<Utc>,

    /// Wall-clock end of the run.
    pub end_time: DateTime<Utc>,

    /// Total run duration in seconds.
    pub total_execution_time: f64,

    /// Final attempt outcome per step, keyed by step name.
    pub agent_results: BTreeMap<String, StepExecution>,

    /// Audit trail of completed steps' contributions.
    pub context_flow: Vec<ContextFlowEvent>,

    /// Per-step result slices (real or fallback) plus orchestration
    /// metadata.
    pub final_results: Value,

    /// Roll-up counts.
    pub execution_summary: ExecutionSummary,

    /// Orchestration-level error (context init or aggregation), if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub orchestration_error: Option<String>,
}

impl OrchestrationRecord {
    /// Serialize to a nested key-value structure for logging or API
    /// responses.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn sample_results() -> BTreeMap<String, StepExecution> {
        let mut results = BTreeMap::new();
        results.insert(
            "sourcing".to_string(),
            StepExecution::completed("sourcing", json!({"analysis": []}), Duration::ZERO),
        );
        results.insert(
            "logistics".to_string(),
            StepExecution::failed("logistics", Duration::ZERO, "unreachable".into()),
        );
        results
    }

    #[test]
    fn summary_counts_completed_and_failed() {
        let summary = ExecutionSummary::compute(&sample_results(), 1, true);

        assert_eq!(summary.total_agents, 2);
        assert_eq!(summary.successful_agents, 1);
        assert_eq!(summary.failed_agents, 1);
        assert_eq!(summary.context_flow_steps, 1);
        assert!(summary.orchestration_success);
    }

    #[test]
    fn summary_of_empty_results() {
        let summary = ExecutionSummary::compute(&BTreeMap::new(), 0, false);
        assert_eq!(summary.total_agents, 0);
        assert!(!summary.orchestration_success);
    }

    #[test]
    fn record_serializes_with_stable_field_names() {
        let now = Utc::now();
        let record = OrchestrationRecord {
            orchestration_id: "orch_1700000000000".into(),
            start_time: now,
            end_time: now,
            total_execution_time: 0.01,
            agent_results: sample_results(),
            context_flow: Vec::new(),
            final_results: json!({}),
            execution_summary: ExecutionSummary::compute(&sample_results(), 0, true),
            orchestration_error: None,
        };

        let value = record.to_value().unwrap();
        for field in [
            "orchestration_id",
            "start_time",
            "end_time",
            "total_execution_time",
            "agent_results",
            "context_flow",
            "final_results",
            "execution_summary",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        // Absent error must be absent from the wire form, not null
        assert!(value.get("orchestration_error").is_none());
    }

    #[test]
    fn orchestration_error_appears_when_set() {
        let now = Utc::now();
        let record = OrchestrationRecord {
            orchestration_id: "orch_1".into(),
            start_time: now,
            end_time: now,
            total_execution_time: 0.0,
            agent_results: BTreeMap::new(),
            context_flow: Vec::new(),
            final_results: json!({}),
            execution_summary: ExecutionSummary::compute(&BTreeMap::new(), 0, false),
            orchestration_error: Some("expected a key-value structure".into()),
        };

        let value = record.to_value().unwrap();
        assert_eq!(
            value["orchestration_error"],
            json!("expected a key-value structure")
        );
    }
}

//! Step execution state and results.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Status of a step within one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step is waiting to run.
    Pending,

    /// Step is currently executing.
    Running,

    /// Step completed successfully.
    Completed,

    /// Step exhausted its retries.
    Failed,
}

impl StepStatus {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a step's final execution attempt.
///
/// The retry loop may produce and discard intermediate attempts; only the
/// last one is retained for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    /// Step name.
    #[serde(rename = "agent_name")]
    pub step: String,

    /// Final status; always terminal in a finished record.
    pub status: StepStatus,

    /// Result record from the step function (empty object on failure).
    pub data: Value,

    /// Elapsed time of the final attempt, in seconds on the wire.
    #[serde(
        rename = "execution_time",
        serialize_with = "serialize_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub duration: Duration,

    /// Description of the last error (failed steps only).
    #[serde(rename = "error_message", skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl StepExecution {
    /// Create a completed execution result.
    pub fn completed(step: &str, data: Value, duration: Duration) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Completed,
            data,
            duration,
            error: None,
        }
    }

    /// Create a failed execution result after exhausted retries.
    pub fn failed(step: &str, duration: Duration, error: String) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Failed,
            data: Value::Object(serde_json::Map::new()),
            duration,
            error: Some(error),
        }
    }

    /// Whether the step ended in `Completed`.
    pub fn succeeded(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    Ok(Duration::from_secs_f64(secs))
}

//! Orchestration engine: sequencing, retry, and result shaping.

pub mod orchestrator;
pub mod record;
pub mod retry;

pub use orchestrator::Orchestrator;
pub use record::{ExecutionSummary, OrchestrationRecord};
pub use retry::{execute_with_retry, RetryPolicy};

//! Canopy - Supply-chain sustainability analysis orchestration.
//!
//! Canopy executes a fixed sequence of analysis steps over a shared
//! context, retries failed steps, substitutes fallback data on exhausted
//! retries, and returns an aggregated record with execution metadata. Step
//! failures never abort a run and errors never cross the `run()` boundary:
//! callers inspect the returned record instead of catching anything.
//!
//! # Modules
//!
//! - [`context`] - Shared run context and the context flow log
//! - [`error`] - Error types and result aliases
//! - [`pipeline`] - The canonical supply-chain step sequence
//! - [`runner`] - Orchestrator, retry policy, and the orchestration record
//! - [`steps`] - Step descriptors and execution results
//!
//! # Example
//!
//! ```
//! use canopy::{Orchestrator, RetryPolicy, StepDescriptor};
//! use serde_json::json;
//!
//! let steps = vec![
//!     StepDescriptor::new("sourcing", |_ctx| Ok(json!({"analysis": []}))),
//! ];
//!
//! let record = Orchestrator::new(steps)
//!     .with_policy(RetryPolicy::no_retries())
//!     .with_domain_slices(["suppliers"])
//!     .run(json!({"suppliers": []}));
//!
//! assert!(record.execution_summary.orchestration_success);
//! assert!(record.agent_results["sourcing"].succeeded());
//! ```

pub mod context;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod steps;

pub use context::{Context, ContextFlowEvent, ContextFlowLog};
pub use error::{CanopyError, Result};
pub use runner::{execute_with_retry, ExecutionSummary, OrchestrationRecord, Orchestrator, RetryPolicy};
pub use steps::{StepDescriptor, StepExecution, StepStatus};

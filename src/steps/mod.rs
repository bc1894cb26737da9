//! Step descriptors and per-step execution results.
//!
//! This module defines the unit of work the orchestrator schedules:
//!
//! - [`StepDescriptor`] - A named analysis function plus its fallback record
//! - [`StepStatus`] - Track step execution state
//! - [`StepExecution`] - Capture the final attempt's outcome
//!
//! Step functions are supplied by the caller and treated as opaque: the
//! orchestrator only knows the `Fn(&Context) -> Result<Value>` contract.
//! A function signals a failed attempt by returning an error; it must not
//! mutate the context it is handed.

pub mod descriptor;
pub mod execution;

pub use descriptor::{IndexFn, StepDescriptor, StepFn};
pub use execution::{StepExecution, StepStatus};

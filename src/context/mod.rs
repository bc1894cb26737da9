//! Shared run context and the context flow log.
//!
//! This module provides the data plane of an orchestration run:
//!
//! - [`Context`] - The key-value store one run's steps read from
//! - [`ContextFlowLog`] - Append-only audit trail of step contributions
//! - [`ContextFlowEvent`] - A single contribution entry
//!
//! The context is exclusively owned by one orchestrator run. Step functions
//! receive it by shared reference and never write to it directly; all
//! mutation goes through the orchestrator.

pub mod flow;
pub mod store;

pub use flow::{ContextFlowEvent, ContextFlowLog};
pub use store::Context;

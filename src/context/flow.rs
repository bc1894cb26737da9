//! Append-only audit trail of step contributions.
//!
//! Each successfully completed step gets one entry listing the top-level
//! keys it contributed to the context. Fallback-resolved steps are not
//! logged — the flow log records genuine progress, not degraded
//! continuation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single flow-log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextFlowEvent {
    /// Name of the step that contributed.
    pub agent: String,
    /// Top-level keys of the step's result record.
    pub context_keys_added: Vec<String>,
    /// When the contribution was merged.
    pub timestamp: DateTime<Utc>,
}

/// Time-ordered log of context contributions.
///
/// The orchestrator is the sole writer; entries are immutable once
/// appended.
#[derive(Debug, Clone, Default)]
pub struct ContextFlowLog {
    events: Vec<ContextFlowEvent>,
}

impl ContextFlowLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for a completed step.
    pub fn record(&mut self, agent: &str, keys_added: Vec<String>) {
        self.events.push(ContextFlowEvent {
            agent: agent.to_string(),
            context_keys_added: keys_added,
            timestamp: Utc::now(),
        });
    }

    /// All entries, in append order.
    pub fn events(&self) -> &[ContextFlowEvent] {
        &self.events
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the log, yielding the entries.
    pub fn into_events(self) -> Vec<ContextFlowEvent> {
        self.events
    }
}

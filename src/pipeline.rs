//! The canonical supply-chain analysis sequence.
//!
//! Wires the fixed four-step pipeline (sourcing, logistics, inventory,
//! carbon accounting) through the generic orchestrator: step order, domain
//! slices, per-step fallback records, and the cross-step lookup indices
//! later steps consult. The analysis functions themselves are supplied by
//! the caller; this module knows nothing about how scores are computed.
//!
//! An optional `enrichment` step can be appended as the terminal step. It
//! runs under the same retry/fallback contract as every other step.

use serde_json::{json, Map, Value};

use crate::context::Context;
use crate::error::Result;
use crate::runner::{Orchestrator, RetryPolicy};
use crate::steps::StepDescriptor;

/// Supplier sustainability analysis step.
pub const SOURCING: &str = "sourcing";
/// Route emission optimization step.
pub const LOGISTICS: &str = "logistics";
/// Waste reduction analysis step.
pub const INVENTORY: &str = "inventory";
/// Overall footprint aggregation step.
pub const CARBON_ACCOUNTING: &str = "carbon_accounting";
/// Optional post-hoc enrichment step.
pub const ENRICHMENT: &str = "enrichment";

/// Input slices the pipeline copies into the context.
pub const DOMAIN_SLICES: &[&str] = &["suppliers", "routes", "inventory"];

/// Builder for the supply-chain orchestrator.
///
/// # Example
///
/// ```
/// use canopy::pipeline::SupplyChainPipeline;
/// use serde_json::json;
///
/// let orchestrator = SupplyChainPipeline::new(
///     |_ctx| Ok(json!({"analysis": [], "top_suppliers": []})),
///     |_ctx| Ok(json!({"optimized_routes": [], "total_emission_reduction": 0})),
///     |_ctx| Ok(json!({"waste_analysis": [], "total_waste_reduction_potential": 0})),
///     |_ctx| Ok(json!({"total_carbon_footprint_tons": 0, "sustainability_score": 0})),
/// )
/// .build();
///
/// let record = orchestrator.run(json!({"suppliers": [], "routes": [], "inventory": []}));
/// assert_eq!(record.execution_summary.failed_agents, 0);
/// ```
pub struct SupplyChainPipeline {
    steps: Vec<StepDescriptor>,
    enrichment: Option<StepDescriptor>,
    policy: RetryPolicy,
}

impl SupplyChainPipeline {
    /// Wire the four analysis functions into the fixed sequence.
    pub fn new<S, L, I, C>(sourcing: S, logistics: L, inventory: I, carbon: C) -> Self
    where
        S: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
        L: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
        I: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
        C: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
    {
        let steps = vec![
            StepDescriptor::new(SOURCING, sourcing)
                .fallback(json!({"analysis": [], "top_suppliers": []}))
                .index(supplier_scores_index),
            StepDescriptor::new(LOGISTICS, logistics)
                .fallback(json!({"optimized_routes": [], "total_emission_reduction": 0}))
                .index(route_emissions_index),
            StepDescriptor::new(INVENTORY, inventory)
                .fallback(json!({"waste_analysis": [], "total_waste_reduction_potential": 0})),
            StepDescriptor::new(CARBON_ACCOUNTING, carbon)
                .fallback(json!({"total_carbon_footprint_tons": 0, "sustainability_score": 0})),
        ];

        Self {
            steps,
            enrichment: None,
            policy: RetryPolicy::default(),
        }
    }

    /// Append the optional enrichment step after carbon accounting.
    pub fn enrichment<F>(mut self, enrich: F) -> Self
    where
        F: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
    {
        self.enrichment =
            Some(StepDescriptor::new(ENRICHMENT, enrich).fallback(json!({"enhanced": false})));
        self
    }

    /// Replace the default retry policy.
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Orchestrator {
        let mut steps = self.steps;
        if let Some(enrichment) = self.enrichment {
            steps.push(enrichment);
        }

        Orchestrator::new(steps)
            .with_policy(self.policy)
            .with_domain_slices(DOMAIN_SLICES.iter().copied())
    }
}

/// Supplier id → sustainability score, from the sourcing result.
fn supplier_scores_index(data: &Value) -> Vec<(String, Value)> {
    let mut scores = Map::new();

    if let Some(analysis) = data.get("analysis").and_then(Value::as_array) {
        for entry in analysis {
            if let Some(id) = entry.get("supplier_id").and_then(Value::as_str) {
                let score = entry
                    .get("sustainability_score")
                    .cloned()
                    .unwrap_or_else(|| json!(0));
                scores.insert(id.to_string(), score);
            }
        }
    }

    vec![("supplier_scores".to_string(), Value::Object(scores))]
}

/// Route id → current emissions, from the logistics result.
fn route_emissions_index(data: &Value) -> Vec<(String, Value)> {
    let mut emissions = Map::new();

    if let Some(routes) = data.get("optimized_routes").and_then(Value::as_array) {
        for route in routes {
            if let Some(id) = route.get("route_id").and_then(Value::as_str) {
                let current = route
                    .get("current_emissions")
                    .cloned()
                    .unwrap_or_else(|| json!(0));
                emissions.insert(id.to_string(), current);
            }
        }
    }

    vec![("route_emissions".to_string(), Value::Object(emissions))]
}

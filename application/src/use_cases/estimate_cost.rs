//! Estimate Cost use case
//!
//! Answers "what would this workload cost per month": runs the selector
//! for the given task and tier, then projects the per-query estimate
//! over the expected monthly volume.

use crate::availability::probe;
use crate::ports::{CredentialStore, ModelInvoker};
use crate::registry_store::SharedRegistry;
use conclave_domain::{QualityTier, SelectionCriteria, estimate_typical, project_monthly, select};
use serde::Serialize;
use std::sync::Arc;

/// Cost estimate query
#[derive(Debug, Clone)]
pub struct EstimateInput {
    pub task_type: String,
    pub quality_tier: QualityTier,
    /// Expected queries per month
    pub assumed_monthly_volume: u64,
}

/// Cost estimate response
#[derive(Debug, Clone, Serialize)]
pub struct EstimateOutput {
    pub model_selected: String,
    pub cost_per_query: f64,
    pub projected_monthly_cost: f64,
}

/// Use case for projecting workload cost
pub struct EstimateCostUseCase<I, C> {
    registry: Arc<SharedRegistry>,
    invoker: Arc<I>,
    credentials: Arc<C>,
}

impl<I, C> EstimateCostUseCase<I, C>
where
    I: ModelInvoker + 'static,
    C: CredentialStore + 'static,
{
    pub fn new(registry: Arc<SharedRegistry>, invoker: Arc<I>, credentials: Arc<C>) -> Self {
        Self {
            registry,
            invoker,
            credentials,
        }
    }

    /// Never fails: selection degrades to the free local fallback, whose
    /// projection is simply zero.
    pub async fn execute(&self, input: &EstimateInput) -> EstimateOutput {
        let registry = self.registry.snapshot();
        let availability = probe(
            registry.as_ref(),
            self.invoker.as_ref(),
            self.credentials.as_ref(),
        )
        .await;

        let criteria =
            SelectionCriteria::for_task(&input.task_type).with_tier(input.quality_tier);
        let profile = select(&registry, &availability, &criteria);
        let cost_per_query = estimate_typical(profile);

        EstimateOutput {
            model_selected: profile.id.clone(),
            cost_per_query,
            projected_monthly_cost: project_monthly(cost_per_query, input.assumed_monthly_volume),
        }
    }
}

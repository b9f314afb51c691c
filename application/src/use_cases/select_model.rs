//! Select Model use case
//!
//! Single-model path: probe availability, run the pure selection
//! algorithm over the current registry snapshot, and apply the
//! deployment's budget policy to the result.

use crate::budget::{BudgetPolicy, BudgetTracker};
use crate::ports::{CredentialStore, ModelInvoker};
use crate::registry_store::SharedRegistry;
use crate::availability::probe;
use conclave_domain::{SelectionCriteria, estimate_typical, select};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced by model selection.
///
/// Per-model availability problems are absorbed inside the probe; the
/// only caller-visible rejection is a hard budget stop.
#[derive(Error, Debug)]
pub enum SelectModelError {
    #[error("budget ceiling exceeded by ${overage:.4} (hard policy)")]
    BudgetExhausted { overage: f64 },
}

/// Response of the selection interface
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub model_id: String,
    /// Expected cost of a typical query against the chosen model
    pub estimated_cost: f64,
    /// Overage the estimated spend would cause, present under the soft
    /// policy when the ceiling is already stretched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_overage: Option<f64>,
}

/// Use case for selecting the single best model for a task
pub struct SelectModelUseCase<I, C> {
    registry: Arc<SharedRegistry>,
    budget: Arc<BudgetTracker>,
    policy: BudgetPolicy,
    invoker: Arc<I>,
    credentials: Arc<C>,
}

impl<I, C> SelectModelUseCase<I, C>
where
    I: ModelInvoker + 'static,
    C: CredentialStore + 'static,
{
    pub fn new(
        registry: Arc<SharedRegistry>,
        budget: Arc<BudgetTracker>,
        policy: BudgetPolicy,
        invoker: Arc<I>,
        credentials: Arc<C>,
    ) -> Self {
        Self {
            registry,
            budget,
            policy,
            invoker,
            credentials,
        }
    }

    /// Select a model for `criteria`.
    ///
    /// Never fails on availability grounds — the selector degrades to the
    /// local fallback. Fails only under the hard budget policy when the
    /// estimated spend would push past the ceiling.
    pub async fn execute(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<SelectionOutcome, SelectModelError> {
        let registry = self.registry.snapshot();
        let availability = probe(
            registry.as_ref(),
            self.invoker.as_ref(),
            self.credentials.as_ref(),
        )
        .await;

        let profile = select(&registry, &availability, criteria);
        let estimated_cost = estimate_typical(profile);
        info!(
            "selected {} for task '{}' ({} tier, est ${:.4}/query)",
            profile.id, criteria.task_type, criteria.quality_tier, estimated_cost
        );

        let period = BudgetTracker::current_period();
        let mut budget_overage = None;
        if let Some(overage) = self.budget.would_exceed(&period, estimated_cost) {
            match self.policy {
                BudgetPolicy::Hard => {
                    return Err(SelectModelError::BudgetExhausted { overage });
                }
                BudgetPolicy::Soft => {
                    warn!(
                        "budget ceiling for {} would be exceeded by ${:.4}, proceeding (soft policy)",
                        period, overage
                    );
                    budget_overage = Some(overage);
                }
            }
        }

        Ok(SelectionOutcome {
            model_id: profile.id.clone(),
            estimated_cost,
            budget_overage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{InvocationRequest, ProviderError};
    use async_trait::async_trait;
    use conclave_domain::{
        CapabilityRegistry, ModelProfile, QualityTier, Strength,
    };

    struct AlwaysUp;

    #[async_trait]
    impl ModelInvoker for AlwaysUp {
        async fn invoke(
            &self,
            _profile: &ModelProfile,
            _request: &InvocationRequest,
        ) -> Result<String, ProviderError> {
            Ok(String::new())
        }

        async fn is_reachable(&self, _profile: &ModelProfile) -> bool {
            true
        }
    }

    struct AllProviders;

    impl CredentialStore for AllProviders {
        fn has_credential(&self, _provider: &str) -> bool {
            true
        }
    }

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::load(
            vec![
                ModelProfile::new("local-small", "local")
                    .with_strengths([Strength::Versatile])
                    .with_quality(5)
                    .local(),
                ModelProfile::new("premium-model", "anthropic")
                    .with_strengths([Strength::Reasoning])
                    .with_quality(9)
                    .with_cost(3.0, 15.0)
                    .requiring_credential(),
            ],
            "local-small",
        )
        .unwrap()
        .registry
    }

    fn use_case(
        ceiling: Option<f64>,
        policy: BudgetPolicy,
    ) -> SelectModelUseCase<AlwaysUp, AllProviders> {
        SelectModelUseCase::new(
            Arc::new(SharedRegistry::new(registry())),
            Arc::new(BudgetTracker::new(ceiling)),
            policy,
            Arc::new(AlwaysUp),
            Arc::new(AllProviders),
        )
    }

    #[tokio::test]
    async fn test_premium_selection() {
        let uc = use_case(None, BudgetPolicy::Soft);
        let criteria =
            SelectionCriteria::for_task("plot_analysis").with_tier(QualityTier::Premium);

        let outcome = uc.execute(&criteria).await.unwrap();
        assert_eq!(outcome.model_id, "premium-model");
        assert!(outcome.budget_overage.is_none());
    }

    #[tokio::test]
    async fn test_hard_policy_rejects_over_budget() {
        let uc = use_case(Some(0.0001), BudgetPolicy::Hard);
        let criteria =
            SelectionCriteria::for_task("plot_analysis").with_tier(QualityTier::Premium);

        let err = uc.execute(&criteria).await.unwrap_err();
        assert!(matches!(err, SelectModelError::BudgetExhausted { .. }));
    }

    #[tokio::test]
    async fn test_soft_policy_warns_and_proceeds() {
        let uc = use_case(Some(0.0001), BudgetPolicy::Soft);
        let criteria =
            SelectionCriteria::for_task("plot_analysis").with_tier(QualityTier::Premium);

        let outcome = uc.execute(&criteria).await.unwrap();
        assert_eq!(outcome.model_id, "premium-model");
        assert!(outcome.budget_overage.is_some());
    }

    #[tokio::test]
    async fn test_free_selection_never_trips_budget() {
        let uc = use_case(Some(0.0), BudgetPolicy::Hard);
        let criteria = SelectionCriteria::for_task("anything"); // balanced: free local wins

        let outcome = uc.execute(&criteria).await.unwrap();
        assert_eq!(outcome.model_id, "local-small");
        assert_eq!(outcome.estimated_cost, 0.0);
    }
}

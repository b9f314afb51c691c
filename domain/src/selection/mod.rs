//! Model selection: pick the single best model for a task under
//! quality/cost/locality constraints.
//!
//! The selector is a pure function of a registry snapshot, an availability
//! snapshot, and the request criteria. It never fails: when every filter
//! eliminates every candidate it degrades to the registry's zero-cost
//! local fallback.

pub mod criteria;

pub use criteria::{LocalityPreference, SelectionCriteria, required_strength};

use crate::cost::estimate_typical;
use crate::registry::{CapabilityRegistry, ModelProfile, QualityTier};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Divisor floor for the balanced tier's value ratio.
///
/// Free models divide by this instead of zero, which makes them dominate
/// the balanced tier unless a paid model's quality/cost ratio is still
/// higher. That dominance is intentional policy, not an accident.
pub const BALANCED_EPSILON: f64 = 0.01;

/// Which models were usable at the moment a selection was made.
///
/// Computed fresh for every selection call by the availability probe and
/// passed in by value, so the selector itself stays pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySnapshot {
    available: BTreeSet<String>,
}

impl AvailabilitySnapshot {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            available: ids.into_iter().collect(),
        }
    }

    pub fn is_available(&self, model_id: &str) -> bool {
        self.available.contains(model_id)
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }
}

/// Select the best model id for `criteria`.
///
/// Filtering order: strength coverage, availability, locality preference,
/// cost cap, then the tier policy over whatever survives. An empty
/// candidate set at the end degrades to the registry fallback rather than
/// failing.
pub fn select<'a>(
    registry: &'a CapabilityRegistry,
    availability: &AvailabilitySnapshot,
    criteria: &SelectionCriteria,
) -> &'a ModelProfile {
    let strength = criteria.required_strength();

    let mut candidates: Vec<&ModelProfile> = registry
        .all()
        .iter()
        .filter(|p| p.covers(&strength))
        .filter(|p| availability.is_available(&p.id))
        .collect();

    match criteria.locality {
        LocalityPreference::Any => {}
        LocalityPreference::PreferLocal => {
            // Preference, not a requirement: only restrict when the
            // restriction leaves something to choose from.
            if candidates.iter().any(|p| p.local_only) {
                candidates.retain(|p| p.local_only);
            }
        }
        LocalityPreference::RequireCloud => {
            candidates.retain(|p| !p.local_only);
        }
    }

    if let Some(max_cost) = criteria.max_cost_per_query {
        candidates.retain(|p| estimate_typical(p) <= max_cost);
    }

    if candidates.is_empty() {
        return registry.fallback();
    }

    apply_tier(&candidates, criteria.quality_tier)
}

/// Apply the tier policy to a non-empty candidate list.
fn apply_tier<'a>(candidates: &[&'a ModelProfile], tier: QualityTier) -> &'a ModelProfile {
    match tier {
        QualityTier::Budget => {
            // Quality floor of 6, waived when nobody meets it
            let acceptable: Vec<&ModelProfile> = candidates
                .iter()
                .copied()
                .filter(|p| p.quality_score >= 6)
                .collect();
            let pool = if acceptable.is_empty() {
                candidates
            } else {
                &acceptable[..]
            };
            best_by(pool, |a, b| {
                a.cost_per_million_input
                    .total_cmp(&b.cost_per_million_input)
                    .then(b.quality_score.cmp(&a.quality_score))
                    .then(a.id.cmp(&b.id))
            })
        }
        QualityTier::Balanced => best_by(candidates, |a, b| {
            value_ratio(b)
                .total_cmp(&value_ratio(a))
                .then(a.id.cmp(&b.id))
        }),
        QualityTier::Premium => best_by(candidates, |a, b| {
            b.quality_score
                .cmp(&a.quality_score)
                .then(a.cost_per_million_input.total_cmp(&b.cost_per_million_input))
                .then(a.id.cmp(&b.id))
        }),
    }
}

/// Balanced-tier value ratio: quality per dollar with a floor on the divisor
fn value_ratio(profile: &ModelProfile) -> f64 {
    profile.quality_score as f64 / profile.cost_per_million_input.max(BALANCED_EPSILON)
}

fn best_by<'a>(
    pool: &[&'a ModelProfile],
    cmp: impl Fn(&ModelProfile, &ModelProfile) -> Ordering,
) -> &'a ModelProfile {
    // Callers guarantee a non-empty pool
    pool.iter()
        .copied()
        .min_by(|a, b| cmp(a, b))
        .unwrap_or_else(|| pool[0])
}

//! Selection request value objects.

use crate::registry::{QualityTier, Strength};
use serde::{Deserialize, Serialize};

/// Where the caller wants the work to run.
///
/// The original design carried two booleans (`prefer_local`,
/// `require_cloud`) with a mutual-exclusion invariant; a three-state enum
/// makes the invalid combination unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalityPreference {
    /// No preference
    #[default]
    Any,
    /// Restrict to local models when any local candidate exists
    PreferLocal,
    /// Exclude local-only models entirely
    RequireCloud,
}

/// One model-selection request (Value Object)
///
/// # Example
///
/// ```
/// use conclave_domain::selection::SelectionCriteria;
/// use conclave_domain::registry::QualityTier;
///
/// let criteria = SelectionCriteria::for_task("plot_analysis")
///     .with_tier(QualityTier::Premium)
///     .with_max_cost(0.05);
///
/// assert_eq!(criteria.quality_tier, QualityTier::Premium);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Key into the task-to-strength mapping
    pub task_type: String,
    /// Cost/quality trade-off policy
    pub quality_tier: QualityTier,
    /// Per-query cost cap in USD; `None` means unbounded
    pub max_cost_per_query: Option<f64>,
    /// Local/cloud placement preference
    pub locality: LocalityPreference,
}

impl SelectionCriteria {
    pub fn for_task(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            quality_tier: QualityTier::default(),
            max_cost_per_query: None,
            locality: LocalityPreference::default(),
        }
    }

    pub fn with_tier(mut self, tier: QualityTier) -> Self {
        self.quality_tier = tier;
        self
    }

    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost_per_query = Some(max_cost);
        self
    }

    pub fn with_locality(mut self, locality: LocalityPreference) -> Self {
        self.locality = locality;
        self
    }

    /// The strength this request's task calls for
    pub fn required_strength(&self) -> Strength {
        required_strength(&self.task_type)
    }
}

/// Fixed task-to-strength mapping.
///
/// Unmapped task types fall back to the generic Versatile strength so any
/// registered generalist remains a candidate.
pub fn required_strength(task_type: &str) -> Strength {
    match task_type {
        "plot_analysis" | "consistency_check" | "critique" => Strength::Reasoning,
        "scene_draft" | "dialogue" | "prose_rewrite" => Strength::Narrative,
        "outline" | "story_structure" | "schema_extraction" => Strength::Structural,
        "summarize" | "tagging" | "classification" => Strength::CostOptimized,
        _ => Strength::Versatile,
    }
}

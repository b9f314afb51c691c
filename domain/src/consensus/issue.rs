//! Consensus finding value objects.

use serde::{Deserialize, Serialize};

/// One finding reported by a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFinding {
    /// Category label used for grouping across models
    pub issue_type: String,
    pub description: String,
    /// Reporter's confidence, clamped to [0, 1]
    pub confidence: f64,
}

impl ModelFinding {
    pub fn new(
        issue_type: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            issue_type: issue_type.into(),
            description: description.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// One merged finding across tournament participants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusIssue {
    /// Category label this group was merged under
    pub issue_type: String,
    /// Most frequent description among contributors (first-seen tie-break)
    pub description: String,
    /// Distinct models that reported this issue type
    pub supporting_models: usize,
    /// Successful participants in the run
    pub total_models: usize,
    /// supporting / total, 0.0 when there were no successful participants
    pub support_ratio: f64,
    /// Mean of contributing confidences, in [0, 1]
    pub confidence: f64,
}

impl ConsensusIssue {
    pub fn new(
        issue_type: impl Into<String>,
        description: impl Into<String>,
        supporting_models: usize,
        total_models: usize,
        confidence: f64,
    ) -> Self {
        let support_ratio = if total_models == 0 {
            0.0
        } else {
            supporting_models as f64 / total_models as f64
        };
        Self {
            issue_type: issue_type.into(),
            description: description.into(),
            supporting_models,
            total_models,
            support_ratio,
            confidence,
        }
    }
}

/// The agreed-vs-disputed verdict produced by the consensus detector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    /// Issues with support at or above the agreement threshold
    pub agreed: Vec<ConsensusIssue>,
    /// Issues below the threshold, surfaced for human review
    pub disputed: Vec<ConsensusIssue>,
}

impl Verdict {
    pub fn is_empty(&self) -> bool {
        self.agreed.is_empty() && self.disputed.is_empty()
    }

    /// Total number of merged issues, agreed and disputed
    pub fn issue_count(&self) -> usize {
        self.agreed.len() + self.disputed.len()
    }
}

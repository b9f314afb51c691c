//! Model profile value object and per-record validation.

use super::strength::{SpeedClass, Strength};
use crate::core::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identity and attributes of one invocable backend model (Value Object)
///
/// Profiles are loaded once at startup and never mutated at runtime;
/// changing a profile requires a full registry reload.
///
/// # Example
///
/// ```
/// use conclave_domain::registry::{ModelProfile, Strength, SpeedClass};
///
/// let profile = ModelProfile::new("sonnet-4.5", "anthropic")
///     .with_strengths([Strength::Reasoning, Strength::Narrative])
///     .with_quality(9)
///     .with_cost(3.0, 15.0)
///     .with_speed(SpeedClass::Medium)
///     .with_context_window(200_000)
///     .requiring_credential();
///
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Stable key identifying this model
    pub id: String,
    /// Routing hint: which provider adapter handles this model
    pub provider: String,
    /// Task capabilities this model is good at
    pub strengths: BTreeSet<Strength>,
    /// Subjective quality, 0-10, fixed at registration
    pub quality_score: u8,
    /// USD per million input tokens
    pub cost_per_million_input: f64,
    /// USD per million output tokens
    pub cost_per_million_output: f64,
    /// Rough latency class
    pub speed_class: SpeedClass,
    /// Context window in tokens
    pub context_window: u32,
    /// Whether a provider credential must be present to invoke
    pub requires_credential: bool,
    /// Whether this model runs only on the local runtime
    pub local_only: bool,
}

impl ModelProfile {
    /// Create a minimal profile; fill in attributes with the builder methods.
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            strengths: BTreeSet::new(),
            quality_score: 5,
            cost_per_million_input: 0.0,
            cost_per_million_output: 0.0,
            speed_class: SpeedClass::default(),
            context_window: 8192,
            requires_credential: false,
            local_only: false,
        }
    }

    pub fn with_strengths(mut self, strengths: impl IntoIterator<Item = Strength>) -> Self {
        self.strengths = strengths.into_iter().collect();
        self
    }

    pub fn with_quality(mut self, score: u8) -> Self {
        self.quality_score = score;
        self
    }

    pub fn with_cost(mut self, per_million_input: f64, per_million_output: f64) -> Self {
        self.cost_per_million_input = per_million_input;
        self.cost_per_million_output = per_million_output;
        self
    }

    pub fn with_speed(mut self, speed: SpeedClass) -> Self {
        self.speed_class = speed;
        self
    }

    pub fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = tokens;
        self
    }

    pub fn requiring_credential(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local_only = true;
        self
    }

    /// Check if this profile holds the given strength (or Versatile)
    pub fn covers(&self, strength: &Strength) -> bool {
        self.strengths.contains(strength) || self.strengths.contains(&Strength::Versatile)
    }

    /// Whether invoking this model costs nothing
    pub fn is_free(&self) -> bool {
        self.cost_per_million_input == 0.0 && self.cost_per_million_output == 0.0
    }

    /// Validate this record in isolation.
    ///
    /// Errors name the offending id so a bad entry can be rejected without
    /// failing the whole table load.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.id.trim().is_empty() {
            return Err(ConfigurationError::EmptyModelId);
        }
        if self.provider.trim().is_empty() {
            return Err(ConfigurationError::MissingProvider {
                id: self.id.clone(),
            });
        }
        if self.quality_score > 10 {
            return Err(ConfigurationError::QualityOutOfRange {
                id: self.id.clone(),
                score: self.quality_score,
            });
        }
        if self.cost_per_million_input < 0.0 || self.cost_per_million_output < 0.0 {
            return Err(ConfigurationError::NegativeCost {
                id: self.id.clone(),
            });
        }
        if self.context_window == 0 {
            return Err(ConfigurationError::ZeroContextWindow {
                id: self.id.clone(),
            });
        }
        if self.local_only && self.requires_credential {
            return Err(ConfigurationError::LocalModelRequiresCredential {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

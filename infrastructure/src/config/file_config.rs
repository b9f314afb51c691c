//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use conclave_application::BudgetPolicy;
use conclave_domain::{ModelProfile, SpeedClass, Strength};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One model profile record from `[[models]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub id: String,
    pub provider: String,
    pub strengths: Vec<Strength>,
    pub quality_score: u8,
    pub cost_per_million_input: f64,
    pub cost_per_million_output: f64,
    pub speed_class: SpeedClass,
    pub context_window: u32,
    pub requires_credential: bool,
    pub local_only: bool,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            provider: String::new(),
            strengths: Vec::new(),
            quality_score: 5,
            cost_per_million_input: 0.0,
            cost_per_million_output: 0.0,
            speed_class: SpeedClass::default(),
            context_window: 8192,
            requires_credential: false,
            local_only: false,
        }
    }
}

impl FileModelConfig {
    /// Convert to the domain profile; validation happens at registry load
    pub fn to_profile(&self) -> ModelProfile {
        let mut profile = ModelProfile::new(&self.id, &self.provider)
            .with_strengths(self.strengths.iter().cloned())
            .with_quality(self.quality_score)
            .with_cost(self.cost_per_million_input, self.cost_per_million_output)
            .with_speed(self.speed_class)
            .with_context_window(self.context_window);
        if self.requires_credential {
            profile = profile.requiring_credential();
        }
        if self.local_only {
            profile = profile.local();
        }
        profile
    }
}

/// Selection configuration from `[selection]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSelectionConfig {
    /// Id of the guaranteed zero-cost local fallback model
    pub fallback_model: String,
}

impl Default for FileSelectionConfig {
    fn default() -> Self {
        Self {
            fallback_model: "ollama-llama3".to_string(),
        }
    }
}

/// Budget configuration from `[budget]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    /// Monthly ceiling in USD; absent means unbounded
    pub monthly_ceiling: Option<f64>,
    /// `soft` warns and proceeds, `hard` rejects selections
    pub policy: BudgetPolicy,
}

/// Tournament configuration from `[tournament]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTournamentConfig {
    pub participant_count: usize,
    pub agreement_threshold: usize,
    pub per_model_timeout_secs: u64,
    pub deadline_secs: u64,
}

impl Default for FileTournamentConfig {
    fn default() -> Self {
        Self {
            participant_count: 3,
            agreement_threshold: 2,
            per_model_timeout_secs: 30,
            deadline_secs: 60,
        }
    }
}

/// One provider adapter entry from `[providers.<name>]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// `openai_compat` or `ollama`
    pub kind: String,
    pub base_url: String,
    /// Environment variable holding the API key, if any
    pub api_key_env: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: "openai_compat".to_string(),
            base_url: String::new(),
            api_key_env: None,
        }
    }
}

/// Complete raw configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub models: Vec<FileModelConfig>,
    pub selection: FileSelectionConfig,
    pub budget: FileBudgetConfig,
    pub tournament: FileTournamentConfig,
    pub providers: HashMap<String, FileProviderConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert!(config.models.is_empty());
        assert_eq!(config.tournament.participant_count, 3);
        assert_eq!(config.budget.policy, BudgetPolicy::Soft);
        assert!(config.budget.monthly_ceiling.is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let toml_str = r#"
            [[models]]
            id = "sonnet"
            provider = "anthropic"
            strengths = ["reasoning", "narrative"]
            quality_score = 9
            cost_per_million_input = 3.0
            cost_per_million_output = 15.0
            speed_class = "medium"
            context_window = 200000
            requires_credential = true

            [selection]
            fallback_model = "llama"

            [budget]
            monthly_ceiling = 25.0
            policy = "hard"

            [providers.anthropic]
            kind = "openai_compat"
            base_url = "https://api.anthropic.com/v1"
            api_key_env = "ANTHROPIC_API_KEY"
        "#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.models.len(), 1);
        let profile = config.models[0].to_profile();
        assert_eq!(profile.id, "sonnet");
        assert_eq!(profile.strengths.len(), 2);
        assert!(profile.requires_credential);
        assert_eq!(config.selection.fallback_model, "llama");
        assert_eq!(config.budget.policy, BudgetPolicy::Hard);
        assert_eq!(
            config.providers["anthropic"].api_key_env.as_deref(),
            Some("ANTHROPIC_API_KEY")
        );
    }
}

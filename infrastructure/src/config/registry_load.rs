//! Registry construction from configuration.
//!
//! Malformed records are logged and skipped individually; only a bad
//! fallback fails the whole load, since the selector's never-fails
//! contract depends on it.

use super::file_config::FileConfig;
use conclave_domain::{
    CapabilityRegistry, ConfigurationError, ModelProfile, SpeedClass, Strength,
};
use tracing::{info, warn};

/// Build the capability registry from loaded configuration.
///
/// An empty `[[models]]` list falls back to the built-in catalog.
pub fn build_registry(config: &FileConfig) -> Result<CapabilityRegistry, ConfigurationError> {
    let (records, fallback_id) = if config.models.is_empty() {
        info!("no models configured, using built-in catalog");
        (default_catalog(), DEFAULT_FALLBACK.to_string())
    } else {
        (
            config.models.iter().map(|m| m.to_profile()).collect(),
            config.selection.fallback_model.clone(),
        )
    };

    let load = CapabilityRegistry::load(records, fallback_id)?;
    for rejected in &load.rejected {
        warn!("rejected model profile: {}", rejected);
    }
    info!("registry loaded with {} model profiles", load.registry.len());
    Ok(load.registry)
}

/// Fallback id of the built-in catalog
pub const DEFAULT_FALLBACK: &str = "ollama-llama3";

/// Built-in model catalog used when no `[[models]]` are configured.
pub fn default_catalog() -> Vec<ModelProfile> {
    vec![
        ModelProfile::new("claude-sonnet-4.5", "anthropic")
            .with_strengths([Strength::Reasoning, Strength::Narrative])
            .with_quality(9)
            .with_cost(3.0, 15.0)
            .with_speed(SpeedClass::Medium)
            .with_context_window(200_000)
            .requiring_credential(),
        ModelProfile::new("claude-haiku-4.5", "anthropic")
            .with_strengths([Strength::CostOptimized, Strength::Versatile])
            .with_quality(7)
            .with_cost(0.80, 4.0)
            .with_speed(SpeedClass::Fast)
            .with_context_window(200_000)
            .requiring_credential(),
        ModelProfile::new("gpt-4.1-mini", "openai")
            .with_strengths([Strength::Structural, Strength::CostOptimized])
            .with_quality(7)
            .with_cost(0.40, 1.60)
            .with_speed(SpeedClass::Fast)
            .with_context_window(1_000_000)
            .requiring_credential(),
        ModelProfile::new("gemini-2.5-flash", "gemini")
            .with_strengths([Strength::Versatile])
            .with_quality(8)
            .with_cost(0.30, 2.50)
            .with_speed(SpeedClass::VeryFast)
            .with_context_window(1_000_000)
            .requiring_credential(),
        ModelProfile::new("ollama-llama3", "ollama")
            .with_strengths([Strength::Versatile])
            .with_quality(6)
            .with_speed(SpeedClass::Fast)
            .with_context_window(8_192)
            .local(),
    ]
}

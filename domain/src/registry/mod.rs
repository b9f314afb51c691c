//! Capability registry: the static catalogue of invocable model profiles.
//!
//! The registry is built once from configuration and is immutable
//! thereafter. A reload constructs a whole new table and swaps it in
//! (see `SharedRegistry` in the application layer) so readers never
//! observe a partially-updated table.

pub mod profile;
pub mod strength;

pub use profile::ModelProfile;
pub use strength::{QualityTier, SpeedClass, Strength};

use crate::core::error::ConfigurationError;
use std::collections::HashMap;

/// Outcome of building a registry from configured records.
///
/// Malformed records are rejected individually; the registry holds the
/// records that passed validation.
#[derive(Debug)]
pub struct RegistryLoad {
    pub registry: CapabilityRegistry,
    /// Per-record validation failures, each naming the offending id
    pub rejected: Vec<ConfigurationError>,
}

/// Ordered, immutable table of model profiles with id lookup.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    profiles: Vec<ModelProfile>,
    index: HashMap<String, usize>,
    fallback_id: String,
}

impl CapabilityRegistry {
    /// Build a registry from configured records.
    ///
    /// Records failing validation (and duplicates of an already-accepted id)
    /// are dropped and reported in [`RegistryLoad::rejected`]. The fallback
    /// must be an accepted zero-cost local profile — the selector's
    /// never-fails contract depends on it — so a bad fallback fails the
    /// whole load.
    pub fn load(
        records: Vec<ModelProfile>,
        fallback_id: impl Into<String>,
    ) -> Result<RegistryLoad, ConfigurationError> {
        let fallback_id = fallback_id.into();
        let mut profiles = Vec::with_capacity(records.len());
        let mut index = HashMap::new();
        let mut rejected = Vec::new();

        for record in records {
            if let Err(e) = record.validate() {
                rejected.push(e);
                continue;
            }
            if index.contains_key(&record.id) {
                rejected.push(ConfigurationError::DuplicateModelId {
                    id: record.id.clone(),
                });
                continue;
            }
            index.insert(record.id.clone(), profiles.len());
            profiles.push(record);
        }

        let fallback = index
            .get(&fallback_id)
            .map(|&i| &profiles[i])
            .ok_or_else(|| ConfigurationError::UnknownFallback {
                id: fallback_id.clone(),
            })?;
        if !fallback.local_only || !fallback.is_free() {
            return Err(ConfigurationError::FallbackNotLocal { id: fallback_id });
        }

        Ok(RegistryLoad {
            registry: Self {
                profiles,
                index,
                fallback_id,
            },
            rejected,
        })
    }

    /// Look up a profile by id
    pub fn lookup(&self, model_id: &str) -> Option<&ModelProfile> {
        self.index.get(model_id).map(|&i| &self.profiles[i])
    }

    /// All profiles in load order
    pub fn all(&self) -> &[ModelProfile] {
        &self.profiles
    }

    /// The guaranteed-available, zero-cost local fallback profile
    pub fn fallback(&self) -> &ModelProfile {
        // Validated by load()
        &self.profiles[self.index[&self.fallback_id]]
    }

    /// Id of the fallback profile
    pub fn fallback_id(&self) -> &str {
        &self.fallback_id
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

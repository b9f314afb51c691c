//! Domain layer for conclave
//!
//! This crate contains the pure business logic of the orchestration
//! engine: model profiles and the capability registry, cost estimation,
//! the selection algorithm, and tournament consensus detection. It has no
//! dependencies on infrastructure or async concerns.
//!
//! # Core Concepts
//!
//! - **Capability Registry**: static catalogue of invocable model
//!   profiles with their cost/quality/strength attributes.
//! - **Quality tier**: named optimization policy (budget / balanced /
//!   premium) governing how selection trades cost against quality.
//! - **Tournament**: a parallel multi-model invocation used for decisions
//!   critical enough to warrant cross-checking.
//! - **Consensus**: the merge of per-model findings into agreed and
//!   disputed issues.

pub mod consensus;
pub mod core;
pub mod cost;
pub mod registry;
pub mod selection;

// Re-export commonly used types
pub use consensus::{
    ConsensusIssue, DEFAULT_AGREEMENT_THRESHOLD, InvocationStatus, ModelFinding,
    ParticipantResult, QUORUM_MINIMUM, TournamentRun, Verdict, detect, extract_findings,
};
pub use crate::core::error::ConfigurationError;
pub use cost::{TYPICAL_INPUT_TOKENS, TYPICAL_OUTPUT_TOKENS, estimate, estimate_typical, project_monthly};
pub use registry::{CapabilityRegistry, ModelProfile, QualityTier, RegistryLoad, SpeedClass, Strength};
pub use selection::{
    AvailabilitySnapshot, BALANCED_EPSILON, LocalityPreference, SelectionCriteria, select,
};

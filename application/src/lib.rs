//! Application layer for conclave
//!
//! Ports (the interfaces the engine needs from the outside world),
//! runtime state (budget tracker, shared registry handle), and the use
//! cases that orchestrate the domain: single-model selection, tournament
//! execution, and cost projection.

pub mod availability;
pub mod budget;
pub mod ports;
pub mod registry_store;
pub mod use_cases;

pub use availability::probe;
pub use budget::{BudgetPolicy, BudgetReport, BudgetTracker, SpendOutcome};
pub use ports::{CredentialStore, InvocationRequest, ModelInvoker, NoCredentials, ProviderError};
pub use registry_store::SharedRegistry;
pub use use_cases::{
    EstimateCostUseCase, EstimateInput, EstimateOutput, RunTournamentError, RunTournamentUseCase,
    SelectModelError, SelectModelUseCase, SelectionOutcome, TournamentConfig, TournamentInput,
    TournamentOutput,
};

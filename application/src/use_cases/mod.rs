//! Use cases: the operations this subsystem offers its callers.

pub mod estimate_cost;
pub mod run_tournament;
pub mod select_model;

pub use estimate_cost::{EstimateCostUseCase, EstimateInput, EstimateOutput};
pub use run_tournament::{
    RunTournamentError, RunTournamentUseCase, TournamentConfig, TournamentInput, TournamentOutput,
};
pub use select_model::{SelectModelError, SelectModelUseCase, SelectionOutcome};

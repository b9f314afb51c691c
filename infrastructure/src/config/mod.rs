//! Configuration: TOML schema, multi-source loading, registry
//! construction.

pub mod file_config;
pub mod loader;
pub mod registry_load;

pub use file_config::{
    FileBudgetConfig, FileConfig, FileModelConfig, FileProviderConfig, FileSelectionConfig,
    FileTournamentConfig,
};
pub use loader::ConfigLoader;
pub use registry_load::{DEFAULT_FALLBACK, build_registry, default_catalog};

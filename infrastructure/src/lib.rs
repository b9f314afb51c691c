//! Infrastructure layer for conclave
//!
//! External adapters: TOML/figment configuration loading, registry
//! construction, environment-variable credentials, the persisted spend
//! ledger, and the HTTP provider adapters behind the `ModelInvoker` port.

pub mod budget_ledger;
pub mod config;
pub mod credentials;
pub mod providers;

pub use budget_ledger::BudgetLedger;
pub use config::{ConfigLoader, FileConfig, build_registry, default_catalog};
pub use credentials::EnvCredentialStore;
pub use providers::{OllamaInvoker, OpenAiCompatInvoker, RoutingInvoker};

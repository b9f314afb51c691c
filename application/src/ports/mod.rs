//! Ports: interfaces the application layer requires from the outside
//! world.

pub mod credential_store;
pub mod model_invoker;

pub use credential_store::{CredentialStore, NoCredentials};
pub use model_invoker::{InvocationRequest, ModelInvoker, ProviderError};

//! Model invoker port
//!
//! Defines the opaque invocation capability the orchestration engine
//! requires from the provider layer. Implementations (adapters) live in
//! the infrastructure layer, one per provider, selected by
//! `ModelProfile::provider`.

use async_trait::async_trait;
use conclave_domain::ModelProfile;
use thiserror::Error;

/// Errors that can occur while invoking a model through a provider
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("No credential configured for provider '{0}'")]
    MissingCredential(String),

    #[error("No adapter registered for provider '{0}'")]
    UnknownProvider(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One invocation request: the caller-supplied prompt plus optional
/// system context
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub prompt: String,
    pub system_context: Option<String>,
}

impl InvocationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_context: None,
        }
    }

    pub fn with_system_context(mut self, context: impl Into<String>) -> Self {
        self.system_context = Some(context.into());
        self
    }
}

/// Capability for calling a remote or local model.
///
/// Callers always wrap `invoke` in an explicit deadline; implementations
/// do not need their own timeout handling beyond transport defaults.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Send the request to the given model and return its raw text output
    async fn invoke(
        &self,
        profile: &ModelProfile,
        request: &InvocationRequest,
    ) -> Result<String, ProviderError>;

    /// Liveness check, used by the availability probe for local-only
    /// profiles
    async fn is_reachable(&self, profile: &ModelProfile) -> bool;
}

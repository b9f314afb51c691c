//! Provider routing: dispatch invocations to the adapter registered for
//! `ModelProfile::provider`.
//!
//! Each provider gets exactly one adapter; routing is a table lookup on
//! the profile's provider field, never an inspection of the model id's
//! textual form.

use crate::config::FileConfig;
use crate::credentials::EnvCredentialStore;
use crate::providers::http::OpenAiCompatInvoker;
use crate::providers::local::OllamaInvoker;
use conclave_application::{InvocationRequest, ModelInvoker, ProviderError};
use conclave_domain::ModelProfile;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Invoker that routes each call to the adapter for the profile's
/// provider
pub struct RoutingInvoker {
    adapters: HashMap<String, Arc<dyn ModelInvoker>>,
}

impl RoutingInvoker {
    pub fn new(adapters: HashMap<String, Arc<dyn ModelInvoker>>) -> Self {
        Self { adapters }
    }

    /// Build the routing table from configuration.
    ///
    /// Configured `[providers.<name>]` entries win; providers referenced
    /// by the built-in catalog get sensible default endpoints.
    pub fn from_config(config: &FileConfig, credentials: &EnvCredentialStore) -> Self {
        let mut adapters: HashMap<String, Arc<dyn ModelInvoker>> = HashMap::new();

        for (provider, settings) in &config.providers {
            let adapter: Arc<dyn ModelInvoker> = match settings.kind.as_str() {
                "ollama" => Arc::new(OllamaInvoker::new(&settings.base_url)),
                "openai_compat" => Arc::new(OpenAiCompatInvoker::new(
                    provider.clone(),
                    &settings.base_url,
                    credentials.api_key(provider),
                )),
                other => {
                    warn!(
                        "provider '{}' has unknown kind '{}', skipping",
                        provider, other
                    );
                    continue;
                }
            };
            adapters.insert(provider.clone(), adapter);
        }

        for (provider, base_url) in Self::default_endpoints() {
            adapters.entry(provider.to_string()).or_insert_with(|| {
                if provider == "ollama" {
                    Arc::new(OllamaInvoker::new(base_url))
                } else {
                    Arc::new(OpenAiCompatInvoker::new(
                        provider,
                        base_url,
                        credentials.api_key(provider),
                    ))
                }
            });
        }

        Self { adapters }
    }

    fn default_endpoints() -> [(&'static str, &'static str); 4] {
        [
            ("anthropic", "https://api.anthropic.com/v1"),
            ("openai", "https://api.openai.com/v1"),
            ("gemini", "https://generativelanguage.googleapis.com/v1beta/openai"),
            ("ollama", "http://localhost:11434"),
        ]
    }

    fn resolve(&self, profile: &ModelProfile) -> Result<&dyn ModelInvoker, ProviderError> {
        self.adapters
            .get(&profile.provider)
            .map(|a| a.as_ref())
            .ok_or_else(|| ProviderError::UnknownProvider(profile.provider.clone()))
    }
}

#[async_trait]
impl ModelInvoker for RoutingInvoker {
    async fn invoke(
        &self,
        profile: &ModelProfile,
        request: &InvocationRequest,
    ) -> Result<String, ProviderError> {
        self.resolve(profile)?.invoke(profile, request).await
    }

    async fn is_reachable(&self, profile: &ModelProfile) -> bool {
        match self.resolve(profile) {
            Ok(adapter) => adapter.is_reachable(profile).await,
            Err(_) => false,
        }
    }
}

//! Local runtime adapter (Ollama-style HTTP API).
//!
//! Local models cost nothing and need no credential, but they are only
//! available while the runtime process is up — `is_reachable` is the
//! liveness check the availability probe relies on for local-only
//! profiles.

use conclave_application::{InvocationRequest, ModelInvoker, ProviderError};
use conclave_domain::ModelProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Adapter for a local Ollama-compatible runtime
pub struct OllamaInvoker {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaInvoker {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Default local endpoint
    pub fn localhost() -> Self {
        Self::new("http://localhost:11434")
    }

    /// Strip the catalog prefix: profile ids like `ollama-llama3` map to
    /// the runtime's `llama3` model name.
    fn runtime_model<'a>(&self, profile: &'a ModelProfile) -> &'a str {
        profile.id.strip_prefix("ollama-").unwrap_or(&profile.id)
    }
}

#[async_trait]
impl ModelInvoker for OllamaInvoker {
    async fn invoke(
        &self,
        profile: &ModelProfile,
        request: &InvocationRequest,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("invoking local model {} via {}", profile.id, url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: self.runtime_model(profile),
                prompt: &request.prompt,
                system: request.system_context.as_deref(),
                stream: false,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::ConnectionError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "local runtime returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(body.response)
    }

    async fn is_reachable(&self, _profile: &ModelProfile) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

//! OpenAI-compatible chat completions adapter.
//!
//! Covers every cloud provider exposing the de-facto standard
//! `/chat/completions` endpoint. The wire protocol is deliberately
//! minimal: the orchestration engine treats invocation as an opaque
//! text-in/text-out capability.

use conclave_application::{InvocationRequest, ModelInvoker, ProviderError};
use conclave_domain::ModelProfile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Adapter for one OpenAI-compatible provider endpoint
pub struct OpenAiCompatInvoker {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    provider: String,
}

impl OpenAiCompatInvoker {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            provider: provider.into(),
        }
    }
}

#[async_trait]
impl ModelInvoker for OpenAiCompatInvoker {
    async fn invoke(
        &self,
        profile: &ModelProfile,
        request: &InvocationRequest,
    ) -> Result<String, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::MissingCredential(self.provider.clone()))?;

        let mut messages = Vec::new();
        if let Some(context) = &request.system_context {
            messages.push(ChatMessage {
                role: "system",
                content: context,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!("invoking {} via {}", profile.id, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&ChatRequest {
                model: &profile.id,
                messages,
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
                "{} returned {}",
                self.provider,
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::RequestFailed(format!("{} returned no choices", self.provider))
            })
    }

    async fn is_reachable(&self, _profile: &ModelProfile) -> bool {
        // Cloud endpoints are gated on credentials, not liveness; only
        // local runtimes are probed. Treat the endpoint as reachable.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_before_any_network_io() {
        let invoker = OpenAiCompatInvoker::new("openai", "https://api.openai.com/v1", None);
        let profile = ModelProfile::new("gpt-4.1-mini", "openai");
        let err = invoker
            .invoke(&profile, &InvocationRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let invoker =
            OpenAiCompatInvoker::new("openai", "https://api.openai.com/v1/", None);
        assert_eq!(invoker.base_url, "https://api.openai.com/v1");
    }
}

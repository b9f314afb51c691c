//! Environment-variable credential store.
//!
//! Providers are mapped to environment variables, either from the
//! `[providers.<name>] api_key_env` config entry or from the well-known
//! defaults. Presence is re-checked on every call — the probe never
//! caches availability, and neither do we.

use crate::config::FileConfig;
use conclave_application::CredentialStore;
use std::collections::HashMap;

/// Credential presence backed by environment variables
#[derive(Debug)]
pub struct EnvCredentialStore {
    /// provider name -> environment variable name
    vars: HashMap<String, String>,
}

impl EnvCredentialStore {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Build from configuration, filling in well-known defaults for
    /// providers without an explicit `api_key_env`.
    pub fn from_config(config: &FileConfig) -> Self {
        let mut vars = Self::well_known();
        for (provider, settings) in &config.providers {
            if let Some(var) = &settings.api_key_env {
                vars.insert(provider.clone(), var.clone());
            }
        }
        Self { vars }
    }

    fn well_known() -> HashMap<String, String> {
        [
            ("anthropic", "ANTHROPIC_API_KEY"),
            ("openai", "OPENAI_API_KEY"),
            ("gemini", "GEMINI_API_KEY"),
        ]
        .into_iter()
        .map(|(p, v)| (p.to_string(), v.to_string()))
        .collect()
    }

    /// The API key for `provider`, if present and non-empty
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let var = self.vars.get(provider)?;
        std::env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl CredentialStore for EnvCredentialStore {
    fn has_credential(&self, provider: &str) -> bool {
        self.api_key(provider).is_some()
    }
}

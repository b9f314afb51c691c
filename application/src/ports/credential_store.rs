//! Credential store port
//!
//! The availability probe only needs to know whether a credential exists
//! for a provider; reading the secret itself is the adapter's business.

/// Presence check for provider credentials
pub trait CredentialStore: Send + Sync {
    /// Whether a credential is configured for `provider`
    fn has_credential(&self, provider: &str) -> bool;
}

/// A store with no credentials at all; useful for offline deployments
/// and tests
#[derive(Debug, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn has_credential(&self, _provider: &str) -> bool {
        false
    }
}

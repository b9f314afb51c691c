//! Domain error types

use thiserror::Error;

/// Per-record registry validation errors.
///
/// Each variant names the offending model id so a malformed entry can be
/// rejected individually instead of failing the whole table load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("model id cannot be empty")]
    EmptyModelId,

    #[error("model '{id}': provider cannot be empty")]
    MissingProvider { id: String },

    #[error("model '{id}': quality score {score} is out of range (0-10)")]
    QualityOutOfRange { id: String, score: u8 },

    #[error("model '{id}': cost per million tokens cannot be negative")]
    NegativeCost { id: String },

    #[error("model '{id}': context window must be positive")]
    ZeroContextWindow { id: String },

    #[error("model '{id}': local-only models cannot require a credential")]
    LocalModelRequiresCredential { id: String },

    #[error("duplicate model id '{id}'")]
    DuplicateModelId { id: String },

    #[error("fallback model '{id}' is not registered")]
    UnknownFallback { id: String },

    #[error("fallback model '{id}' must be a zero-cost local profile")]
    FallbackNotLocal { id: String },
}

impl ConfigurationError {
    /// The model id this error refers to, if any
    pub fn model_id(&self) -> Option<&str> {
        match self {
            ConfigurationError::EmptyModelId => None,
            ConfigurationError::MissingProvider { id }
            | ConfigurationError::QualityOutOfRange { id, .. }
            | ConfigurationError::NegativeCost { id }
            | ConfigurationError::ZeroContextWindow { id }
            | ConfigurationError::LocalModelRequiresCredential { id }
            | ConfigurationError::DuplicateModelId { id }
            | ConfigurationError::UnknownFallback { id }
            | ConfigurationError::FallbackNotLocal { id } => Some(id),
        }
    }
}

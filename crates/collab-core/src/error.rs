//! Error types for the platform facade

use collab_access::RegistryError;
use collab_onboarding::OnboardingError;
use std::path::PathBuf;

/// Main platform error type
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    /// Configuration or dataset file could not be used
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Onboarding operation refused
    #[error("onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    /// Store write refused
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// No principal registered for a login
    #[error("unknown principal: {0}")]
    UnknownPrincipal(String),
}

impl CollabError {
    /// Check if the error stems from a missing link between records
    #[inline]
    #[must_use]
    pub fn is_missing_link(&self) -> bool {
        match self {
            Self::Onboarding(e) => e.is_missing_link(),
            Self::UnknownPrincipal(_) => true,
            Self::Config(_) | Self::Registry(_) => false,
        }
    }

    /// Check if the caller passed bad input
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::Onboarding(e) => e.is_caller_error(),
            Self::Config(_) | Self::Registry(_) => true,
            Self::UnknownPrincipal(_) => false,
        }
    }
}

/// Configuration and dataset file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("{path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File extension maps to no known format
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Well-formed but semantically invalid
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

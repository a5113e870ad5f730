//! Error types surfaced by the resolver
//!
//! Only two errors ever reach a caller: [`ConfigError`] at construction time
//! and [`ResolveError`] from a lookup. Provider and cache failures are
//! contained inside the resolver.

use thiserror::Error;

/// Errors returned by [`SecretResolver::resolve`](crate::SecretResolver::resolve)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No cache entry and no provider in the chain had a value for `key`.
    ///
    /// Carries only the key. The providers that were tried are never
    /// reported.
    #[error("Secret not found: {key}")]
    NotFound { key: String },
}

impl ResolveError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// The key that failed to resolve
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } => key,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors raised while building a resolver or loading its configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("encryption_key is required; cached secrets are never stored unencrypted")]
    MissingEncryptionKey,

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid_value(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

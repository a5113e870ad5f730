//! Core traits and types for secret providers

use std::fmt;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use thiserror::Error;

/// A resolved secret
///
/// Immutable once handed to a caller. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretResult {
    /// The key that was looked up
    pub key: String,
    /// The secret value
    pub value: String,
    /// Which provider (or `"cache"`) answered
    pub source: String,
    /// When the value was resolved
    pub fetched_at: SystemTime,
    /// Cache lifetime applied to this result, if any
    pub ttl: Option<Duration>,
}

impl SecretResult {
    /// Create a result fetched now, without a TTL
    pub fn new(key: impl Into<String>, value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source: source.into(),
            fetched_at: SystemTime::now(),
            ttl: None,
        }
    }

    /// Attach a cache lifetime
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for SecretResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResult")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .field("fetched_at", &self.fetched_at)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Errors a provider can raise while talking to its backing store
///
/// "Not found" is never an error: providers return `Ok(None)` for that.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provider error: {0}")]
    Other(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A named source of secret values
///
/// Implementations:
/// - Process environment (`EnvProvider`)
/// - Platform runtime bindings (`BindingProvider`)
/// - External vault placeholder (`VaultProvider`)
/// - Custom implementations (hosted secret managers, test doubles, etc.)
///
/// # Example
///
/// ```
/// use vaultline_core::providers::{SecretProvider, BindingProvider};
///
/// # tokio_test_block(async {
/// let provider = BindingProvider::new();
/// provider.bind("API_TOKEN", "t0ken");
/// let hit = provider.get("API_TOKEN").await.unwrap().unwrap();
/// assert_eq!(hit.source, "binding");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Human-readable name, used in diagnostics
    fn name(&self) -> &str;

    /// The source tag reported for values this provider returns
    fn source(&self) -> &str {
        self.name()
    }

    /// Look up a secret
    ///
    /// Returns `Ok(None)` when the provider has no value for `key`. An `Err`
    /// means the backing store itself failed.
    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_result_debug_redacts_value() {
        let result = SecretResult::new("db", "hunter2", "env");
        let printed = format!("{:?}", result);
        assert!(printed.contains("db"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_secret_result_with_ttl() {
        let result = SecretResult::new("db", "v", "env").with_ttl(Some(Duration::from_secs(5)));
        assert_eq!(result.ttl, Some(Duration::from_secs(5)));
        assert_eq!(result.source, "env");
    }
}

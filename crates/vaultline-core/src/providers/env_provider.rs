//! Environment variable provider

use std::env;

use async_trait::async_trait;

use super::traits::{ProviderResult, SecretProvider, SecretResult};

/// Provider that reads secrets injected into the process environment
///
/// Covers both shell-exported variables and values injected at build or
/// deploy time. Empty variables are treated as absent.
///
/// # Key mapping
///
/// The key is tried as-is first. Then, if a prefix is configured, the
/// prefixed and normalized form is tried: `db-password` with prefix `APP_`
/// → `APP_DB_PASSWORD`. Without a prefix the normalized form alone is
/// tried (`DB_PASSWORD`).
///
/// # Example
///
/// ```
/// use vaultline_core::providers::{SecretProvider, EnvProvider};
///
/// let provider = EnvProvider::with_prefix("APP_");
/// assert_eq!(provider.name(), "env");
/// assert_eq!(provider.env_var_name("db-password"), "APP_DB_PASSWORD");
/// ```
#[derive(Debug, Default, Clone)]
pub struct EnvProvider {
    prefix: Option<String>,
}

impl EnvProvider {
    /// Create a provider that reads variables without a prefix
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a provider that also looks up `<prefix><NORMALIZED_KEY>`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// The normalized variable name for a key
    pub fn env_var_name(&self, key: &str) -> String {
        let normalized = key
            .to_uppercase()
            .replace(|c: char| matches!(c, '-' | '.' | '/'), "_");
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, normalized),
            None => normalized,
        }
    }

    fn read(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.is_empty())
    }
}

#[async_trait]
impl SecretProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>> {
        let value = Self::read(key).or_else(|| {
            let mapped = self.env_var_name(key);
            if mapped == key {
                None
            } else {
                Self::read(&mapped)
            }
        });

        Ok(value.map(|value| SecretResult::new(key, value, self.source())))
    }
}

//! Platform runtime binding provider

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{ProviderResult, SecretProvider, SecretResult};

/// Provider backed by key/value bindings the hosting platform hands to the
/// process at runtime
///
/// The host populates the bindings (at startup or per request) and the
/// provider answers lookups from them. Also handy as an in-memory provider
/// in tests.
///
/// # Example
///
/// ```
/// use vaultline_core::providers::BindingProvider;
///
/// let provider = BindingProvider::new();
/// provider.bind("STRIPE_KEY", "sk_test_123");
/// assert_eq!(provider.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BindingProvider {
    bindings: RwLock<HashMap<String, String>>,
}

impl BindingProvider {
    /// Create a provider with no bindings
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Create a provider with initial bindings
    pub fn with_bindings(initial: HashMap<String, String>) -> Self {
        Self {
            bindings: RwLock::new(initial),
        }
    }

    /// Add or replace a binding
    pub fn bind(&self, key: impl Into<String>, value: impl Into<String>) {
        self.bindings.write().insert(key.into(), value.into());
    }

    /// Remove a binding, returning whether it existed
    pub fn unbind(&self, key: &str) -> bool {
        self.bindings.write().remove(key).is_some()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SecretProvider for BindingProvider {
    fn name(&self) -> &str {
        "binding"
    }

    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>> {
        let value = self.bindings.read().get(key).cloned();
        Ok(value.map(|value| SecretResult::new(key, value, self.source())))
    }
}

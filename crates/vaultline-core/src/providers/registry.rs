//! Provider registry for building chains from provider names

use std::collections::HashMap;
use std::sync::Arc;

use super::binding_provider::BindingProvider;
use super::env_provider::EnvProvider;
use super::traits::SecretProvider;
use super::vault_provider::VaultProvider;
use crate::error::{ConfigError, ConfigResult};

/// Factory function type for creating providers
pub type ProviderFactory = Box<dyn Fn() -> Arc<dyn SecretProvider> + Send + Sync>;

/// Definition of a registered provider
pub struct ProviderDefinition {
    /// Unique name for this provider
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function to create instances
    pub factory: ProviderFactory,
}

impl std::fmt::Debug for ProviderDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Name-keyed set of provider factories
///
/// Lets a host describe its chain as a list of names (for example from a
/// config file) and turn it into provider instances.
///
/// # Example
///
/// ```
/// use vaultline_core::providers::ProviderRegistry;
///
/// let registry = ProviderRegistry::with_builtins();
/// let chain = registry.build_chain(&["env", "vault"]).unwrap();
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain[0].name(), "env");
/// ```
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    definitions: HashMap<String, ProviderDefinition>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in providers: `env`, `binding`, `vault`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            "env",
            "Read secrets from process environment variables",
            Box::new(|| Arc::new(EnvProvider::new())),
        );
        registry.register(
            "binding",
            "Read secrets from platform runtime bindings",
            Box::new(|| Arc::new(BindingProvider::new())),
        );
        registry.register(
            "vault",
            "External vault placeholder (always absent)",
            Box::new(|| Arc::new(VaultProvider::new())),
        );
        registry
    }

    /// Register a provider factory, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, description: &str, factory: ProviderFactory) {
        self.definitions.insert(
            name.to_string(),
            ProviderDefinition {
                name: name.to_string(),
                description: description.to_string(),
                factory,
            },
        );
    }

    /// Remove a provider factory
    pub fn unregister(&mut self, name: &str) -> bool {
        self.definitions.remove(name).is_some()
    }

    /// Check if a provider is registered
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Create a provider by name
    pub fn create(&self, name: &str) -> Option<Arc<dyn SecretProvider>> {
        self.definitions.get(name).map(|def| (def.factory)())
    }

    /// List registered providers as `(name, description)` pairs, sorted by name
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .definitions
            .values()
            .map(|def| (def.name.clone(), def.description.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Build a provider chain in the given order
    ///
    /// Fails on the first unknown name.
    pub fn build_chain(&self, names: &[&str]) -> ConfigResult<Vec<Arc<dyn SecretProvider>>> {
        names
            .iter()
            .map(|name| {
                self.create(name).ok_or_else(|| {
                    ConfigError::invalid_value("providers", format!("unknown provider '{}'", name))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_providers_registered() {
        let registry = ProviderRegistry::with_builtins();
        assert!(registry.contains("env"));
        assert!(registry.contains("binding"));
        assert!(registry.contains("vault"));
        assert!(!ProviderRegistry::new().contains("env"));
    }

    #[test]
    fn test_create_unknown_provider() {
        let registry = ProviderRegistry::with_builtins();
        assert!(registry.create("nonexistent_xyz").is_none());
    }

    #[test]
    fn test_list_providers_sorted() {
        let registry = ProviderRegistry::with_builtins();
        let names: Vec<_> = registry.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["binding", "env", "vault"]);
    }

    #[test]
    fn test_register_and_unregister_custom_provider() {
        let mut registry = ProviderRegistry::with_builtins();
        registry.register(
            "staging-bindings",
            "Bindings for the staging host",
            Box::new(|| Arc::new(BindingProvider::new())),
        );

        let provider = registry.create("staging-bindings").unwrap();
        assert_eq!(provider.name(), "binding");

        assert!(registry.unregister("staging-bindings"));
        assert!(!registry.contains("staging-bindings"));
    }

    #[test]
    fn test_build_chain_preserves_order() {
        let registry = ProviderRegistry::with_builtins();
        let chain = registry.build_chain(&["vault", "env", "binding"]).unwrap();
        let names: Vec<_> = chain.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["vault", "env", "binding"]);
    }

    #[test]
    fn test_build_chain_unknown_name() {
        let registry = ProviderRegistry::with_builtins();
        let err = match registry.build_chain(&["env", "keychain"]) {
            Ok(_) => panic!("expected an unknown provider error"),
            Err(e) => e,
        };
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("unknown provider 'keychain'"));
    }
}

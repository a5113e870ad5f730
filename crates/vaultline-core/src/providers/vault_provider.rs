//! External vault provider placeholder

use async_trait::async_trait;

use super::traits::{ProviderResult, SecretProvider, SecretResult};

/// Placeholder for a hosted secret manager
///
/// Holds its place in the chain but always answers "absent" until a real
/// backend is wired in.
#[derive(Debug, Clone)]
pub struct VaultProvider {
    endpoint: Option<String>,
}

impl VaultProvider {
    pub fn new() -> Self {
        Self { endpoint: None }
    }

    /// Record the vault endpoint this provider will eventually talk to
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl Default for VaultProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for VaultProvider {
    fn name(&self) -> &str {
        "vault"
    }

    async fn get(&self, key: &str) -> ProviderResult<Option<SecretResult>> {
        tracing::trace!(key, endpoint = ?self.endpoint, "vault provider has no backend; reporting absent");
        Ok(None)
    }
}

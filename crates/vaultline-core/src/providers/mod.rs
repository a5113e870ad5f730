//! Secret provider abstractions and implementations
//!
//! This module provides the pluggable backends the resolver chains together:
//! - `SecretProvider` trait for implementing custom providers
//! - Built-in implementations: `EnvProvider`, `BindingProvider`, `VaultProvider`
//! - A registry for building provider chains by name

mod traits;
mod env_provider;
mod binding_provider;
mod vault_provider;
mod registry;

pub use traits::{SecretProvider, SecretResult, ProviderError, ProviderResult};
pub use env_provider::EnvProvider;
pub use binding_provider::BindingProvider;
pub use vault_provider::VaultProvider;
pub use registry::{ProviderRegistry, ProviderDefinition, ProviderFactory};

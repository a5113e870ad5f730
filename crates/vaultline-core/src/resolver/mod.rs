//! Unified secret resolution
//!
//! This module provides the single entry point callers use to look up
//! secrets, plus the configuration it is built from.

mod config;
mod secret_resolver;

pub use config::{ResolverConfig, ENV_CACHE_TTL_MS, ENV_ENCRYPTION_KEY, ENV_PROVIDERS};
pub use secret_resolver::{SecretResolver, SecretResolverBuilder};

//! Vaultline Core
//!
//! Unified secret resolution for automation hosts. Callers ask for a secret
//! by name; the resolver answers from a local encrypted cache or from the
//! first provider in an ordered chain that has the value.
//!
//! ## Resolution
//!
//! ```rust,ignore
//! use vaultline_core::{SecretResolver, EnvProvider, VaultProvider, TracingMetrics};
//!
//! let resolver = SecretResolver::builder()
//!     .encryption_key(std::env::var("VAULTLINE_ENCRYPTION_KEY")?)
//!     .cache_ttl(Duration::from_secs(300))
//!     .provider(Arc::new(EnvProvider::new()))
//!     .provider(Arc::new(VaultProvider::new()))
//!     .metrics(Arc::new(TracingMetrics::new()))
//!     .build()?;
//!
//! let token = resolver.resolve("GITHUB_TOKEN").await?;
//! ```
//!
//! Provider failures never reach the caller: a failing provider is skipped
//! and the chain continues. The only lookup error is
//! [`ResolveError::NotFound`].

pub mod error;
pub mod providers;
pub mod cache;
pub mod telemetry;
pub mod resolver;

// Re-export commonly used types
pub use error::{ConfigError, ConfigResult, ResolveError, ResolveResult};

pub use providers::{
    SecretProvider, SecretResult, ProviderError, ProviderResult,
    EnvProvider, BindingProvider, VaultProvider, ProviderRegistry,
};

pub use cache::{CacheCipher, CacheError, EncodedValue};

pub use telemetry::{
    MetricsSink, SharedMetrics, ResolutionEvent,
    NoOpMetrics, TracingMetrics, RecordingMetrics,
};

pub use resolver::{SecretResolver, SecretResolverBuilder, ResolverConfig};

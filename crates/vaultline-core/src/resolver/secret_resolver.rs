//! Unified secret resolution over an ordered provider chain
//!
//! Lookup order for every `resolve` call:
//! 1. The local encrypted cache (depth 0)
//! 2. Each provider in chain order (depth `i + 1`)
//!
//! The first provider that returns a value wins and its value is written
//! through to the cache.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::RwLock;
use tokio::time::Instant;

use super::config::ResolverConfig;
use crate::cache::{CacheCipher, CacheEntry, CacheStore};
use crate::error::{ConfigResult, ResolveError, ResolveResult};
use crate::providers::{ProviderRegistry, SecretProvider, SecretResult};
use crate::telemetry::{NoOpMetrics, SharedMetrics, CACHE_SOURCE};

/// Resolves secrets from a cache and a priority-ordered provider chain
///
/// Owns its cache; two resolvers never share entries.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vaultline_core::{SecretResolver, BindingProvider};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let bindings = Arc::new(BindingProvider::new());
/// bindings.bind("API_TOKEN", "t0ken");
///
/// let resolver = SecretResolver::builder()
///     .encryption_key("local-dev-key")
///     .provider(bindings)
///     .build()
///     .unwrap();
///
/// let secret = resolver.resolve("API_TOKEN").await.unwrap();
/// assert_eq!(secret.value, "t0ken");
/// assert_eq!(secret.source, "binding");
///
/// // Second lookup is served from the cache
/// assert_eq!(resolver.resolve("API_TOKEN").await.unwrap().source, "cache");
/// # });
/// ```
pub struct SecretResolver {
    providers: RwLock<Vec<Arc<dyn SecretProvider>>>,
    cache: CacheStore,
    cipher: CacheCipher,
    default_ttl: Option<Duration>,
    metrics: SharedMetrics,
}

impl SecretResolver {
    /// Create a resolver with an empty provider chain
    ///
    /// Fails with `ConfigError::MissingEncryptionKey` if the config carries
    /// no encryption key.
    pub fn new(config: ResolverConfig) -> ConfigResult<Self> {
        Self::builder().config(config).build()
    }

    /// Start building a resolver
    pub fn builder() -> SecretResolverBuilder {
        SecretResolverBuilder::default()
    }

    /// Create a resolver whose chain is built from `config.providers`
    pub fn from_config(config: ResolverConfig, registry: &ProviderRegistry) -> ConfigResult<Self> {
        let names: Vec<&str> = config.providers.iter().map(String::as_str).collect();
        let chain = registry.build_chain(&names)?;
        Self::builder().config(config).providers(chain).build()
    }

    /// Insert a provider into the chain
    ///
    /// `position` is a 0-based chain index; providers at and after it shift
    /// back by one. `None`, or an index past the end, appends.
    pub fn register_provider(&self, provider: Arc<dyn SecretProvider>, position: Option<usize>) {
        let mut providers = self.providers.write();
        let index = position.unwrap_or(providers.len()).min(providers.len());
        tracing::debug!(provider = provider.name(), index, "registering provider");
        providers.insert(index, provider);
    }

    /// Names of the providers in chain order
    pub fn providers(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// The TTL applied when `resolve` is called without one
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    /// Resolve a secret, caching it with the default TTL
    pub async fn resolve(&self, key: &str) -> ResolveResult<SecretResult> {
        self.resolve_inner(key, None).await
    }

    /// Resolve a secret, caching a provider hit for `ttl` instead of the
    /// default
    pub async fn resolve_with_ttl(&self, key: &str, ttl: Duration) -> ResolveResult<SecretResult> {
        self.resolve_inner(key, Some(ttl)).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn resolve_inner(
        &self,
        key: &str,
        explicit_ttl: Option<Duration>,
    ) -> ResolveResult<SecretResult> {
        let started = Instant::now();

        if let Some(hit) = self.read_cache(key) {
            self.metrics
                .on_resolve(key, CACHE_SOURCE, 0, started.elapsed());
            return Ok(hit);
        }

        // Snapshot the chain so no lock is held across provider I/O
        let chain: Vec<Arc<dyn SecretProvider>> = self.providers.read().clone();
        let started = Instant::now();

        for (index, provider) in chain.iter().enumerate() {
            match provider.get(key).await {
                Ok(Some(found)) => {
                    let ttl = explicit_ttl.or(self.default_ttl);
                    self.write_cache(key, &found, ttl);
                    self.metrics
                        .on_resolve(key, &found.source, index + 1, started.elapsed());
                    return Ok(SecretResult {
                        key: key.to_string(),
                        ttl,
                        ..found
                    });
                }
                Ok(None) => {
                    tracing::trace!(provider = provider.name(), "provider has no value");
                }
                Err(err) => {
                    tracing::debug!(
                        provider = provider.name(),
                        error = %err,
                        "provider failed; continuing with next provider"
                    );
                }
            }
        }

        tracing::debug!(providers = chain.len(), "secret not found in any provider");
        self.metrics.on_miss(key);
        Err(ResolveError::not_found(key))
    }

    fn read_cache(&self, key: &str) -> Option<SecretResult> {
        let entry = self.cache.get(key)?;
        match self.cipher.decode(entry.encoded()) {
            Ok(value) => Some(SecretResult {
                key: key.to_string(),
                value,
                source: CACHE_SOURCE.to_string(),
                fetched_at: SystemTime::now(),
                ttl: entry.ttl(),
            }),
            Err(err) => {
                tracing::debug!(error = %err, "unreadable cache entry; treating as miss");
                None
            }
        }
    }

    fn write_cache(&self, key: &str, found: &SecretResult, ttl: Option<Duration>) {
        match self.cipher.encode(&found.value) {
            Ok(encoded) => {
                self.cache
                    .put(key, CacheEntry::new(encoded, found.source.clone(), ttl));
            }
            // Never fall back to storing plaintext
            Err(err) => tracing::debug!(error = %err, "failed to encode value; not caching"),
        }
    }

    /// Drop the cached entry for one key
    pub fn invalidate(&self, key: &str) -> bool {
        self.cache.remove(key)
    }

    /// Drop every cached entry
    pub fn reset_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached entries, expired ones included
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &CacheStore {
        &self.cache
    }
}

impl fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResolver")
            .field("providers", &self.providers())
            .field("cached", &self.cache.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

/// Builder for [`SecretResolver`]
#[derive(Default)]
pub struct SecretResolverBuilder {
    config: ResolverConfig,
    // Exact TTL from `cache_ttl`; overrides the config's millisecond value
    cache_ttl: Option<Duration>,
    providers: Vec<Arc<dyn SecretProvider>>,
    metrics: Option<SharedMetrics>,
}

impl SecretResolverBuilder {
    /// Replace the whole config, including any TTL set by `cache_ttl`
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self.cache_ttl = None;
        self
    }

    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.config.encryption_key = Some(key.into());
        self
    }

    /// Default lifetime for cache entries
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Append a provider to the chain
    pub fn provider(mut self, provider: Arc<dyn SecretProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Append several providers to the chain, in order
    pub fn providers<I>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn SecretProvider>>,
    {
        self.providers.extend(providers);
        self
    }

    /// Sink for resolution telemetry
    pub fn metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validate the configuration and build the resolver
    pub fn build(self) -> ConfigResult<SecretResolver> {
        let key = self.config.require_encryption_key()?;

        Ok(SecretResolver {
            cipher: CacheCipher::new(key),
            providers: RwLock::new(self.providers),
            cache: CacheStore::new(),
            default_ttl: self.cache_ttl.or_else(|| self.config.cache_ttl()),
            metrics: self.metrics.unwrap_or_else(|| Arc::new(NoOpMetrics::new())),
        })
    }
}

impl fmt::Debug for SecretResolverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResolverBuilder")
            .field("config", &self.config)
            .field("cache_ttl", &self.cache_ttl)
            .field("providers", &format!("[{} providers]", self.providers.len()))
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
